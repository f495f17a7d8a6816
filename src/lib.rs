/// TLDR - A Discord bot that summarizes a channel's messages for a
/// natural-language time range using ChatGPT.
///
/// A `tldr <phrase>` command flows through a strictly sequential pipeline:
/// 1. The phrase is resolved to a concrete time range (locally for common
///    relative phrases, otherwise by a schema-constrained model call)
/// 2. The channel's history for that range is paged in from Discord
/// 3. Messages become an ordered transcript
/// 4. The transcript is summarized by the model and rendered as an embed
///
/// # Architecture
///
/// The system uses:
/// - poise/serenity for the Discord gateway, commands and history API
/// - the `OpenAI` Responses API over reqwest for both model calls
/// - Tokio for async runtime
///
/// Collaborators are injected as trait objects, so every stage can be
/// exercised without network access.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tldr::ai::LlmClient;
/// use tldr::core::models::ChannelHandle;
/// use tldr::features::{CommandHandler, HandlerSettings, HistorySource};
///
/// async fn summarize(history: Arc<dyn HistorySource>) {
///     tldr::setup_logging();
///
///     let model = Arc::new(LlmClient::new("sk-dummy".to_string(), None, "gpt-5".to_string()));
///     let handler = CommandHandler::new(model, history, HandlerSettings::default());
///
///     let reply = handler
///         .handle("last hour", ChannelHandle(1234), chrono::Utc::now())
///         .await;
///     println!("{}: {}", reply.title, reply.description);
/// }
/// ```
// Module declarations
pub mod ai;
pub mod core;
pub mod discord;
pub mod errors;
pub mod features;
pub mod utils;

pub use ai::estimate_tokens;
pub use errors::TldrError;

/// Configure structured logging with JSON format.
///
/// Verbosity follows `RUST_LOG` and defaults to `info`. Call once at startup.
///
/// # Example
///
/// ```
/// tldr::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
