//! `tldr` and `tldrhelp` commands, usable as prefix or slash commands.

use chrono::Utc;
use poise::serenity_prelude as serenity;
use tracing::{error, info};

use super::response_builder::create_reply;
use crate::core::models::ChannelHandle;
use crate::features::CommandHandler;
use crate::features::render::{CANONICAL_FAILURE_MESSAGE, render_help};

/// poise data shared by every invocation; immutable after setup
pub struct Data {
    pub handler: CommandHandler,
}

/// poise error type
pub type DiscordError = serenity::Error;
pub type Context<'a> = poise::Context<'a, Data, DiscordError>;

/// Summarize this channel's messages for a natural-language time range
#[poise::command(prefix_command, slash_command)]
pub async fn tldr(
    ctx: Context<'_>,
    #[description = "time range, e.g. \"last hour\" or \"yesterday\""]
    #[rest]
    request: Option<String>,
) -> Result<(), DiscordError> {
    let request = request.unwrap_or_default();
    info!(
        "tldr invoked by {} in channel {} with {:?}",
        ctx.author().name,
        ctx.channel_id(),
        request
    );

    ctx.defer_or_broadcast().await?;

    let reply = ctx
        .data()
        .handler
        .handle(&request, ChannelHandle(ctx.channel_id().get()), Utc::now())
        .await;

    ctx.send(create_reply(&reply)).await?;
    Ok(())
}

/// Show help information for the TLDR bot
#[poise::command(prefix_command, slash_command)]
pub async fn tldrhelp(ctx: Context<'_>) -> Result<(), DiscordError> {
    ctx.send(create_reply(&ctx.data().handler.help())).await?;
    Ok(())
}

/// Framework error hook. Every failure becomes a reply; nothing reaches the
/// framework's default handler except events without a command context.
pub async fn on_error(error: poise::FrameworkError<'_, Data, DiscordError>) {
    match error {
        poise::FrameworkError::ArgumentParse { ctx, error, .. } => {
            info!("Argument parse failure: {}", error);
            let prefix = ctx.data().handler.settings().command_prefix.clone();
            if let Err(e) = ctx.send(create_reply(&render_help(&prefix))).await {
                error!("Failed to send usage reply: {}", e);
            }
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Command {} failed: {}", ctx.command().name, error);
            if let Err(e) = ctx.say(CANONICAL_FAILURE_MESSAGE).await {
                error!("Failed to send failure reply: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling framework error: {}", e);
            }
        }
    }
}
