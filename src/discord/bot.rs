use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{error, info};

use super::client::DiscordHistory;
use super::commands::{Data, on_error, tldr, tldrhelp};
use crate::ai::client::{LanguageModel, LlmClient};
use crate::core::config::AppConfig;
use crate::errors::TldrError;
use crate::features::{CommandHandler, HandlerSettings};

/// Connect to the gateway and serve commands until the client stops.
///
/// # Errors
///
/// Returns `DiscordError` if the client cannot be built or the gateway
/// connection ends with an error.
pub async fn run(config: AppConfig) -> Result<(), TldrError> {
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MESSAGES;

    let model: Arc<dyn LanguageModel> = Arc::new(LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_org_id.clone(),
        config.model_name(),
    ));
    let settings = HandlerSettings::from(&config);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![tldr(), tldrhelp()],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Discord bot connected as {}", ready.user.name);

                if let Err(e) =
                    poise::builtins::register_globally(ctx, &framework.options().commands).await
                {
                    error!("Failed to register slash commands: {}", e);
                }

                let history = Arc::new(DiscordHistory::new(ctx.http.clone()));
                Ok(Data {
                    handler: CommandHandler::new(model, history, settings),
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_bot_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord TLDR bot");
    client.start().await?;
    Ok(())
}
