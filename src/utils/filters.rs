use crate::core::models::HistoryMessage;

/// Command names whose invocations are never part of a summarized conversation.
pub const BOT_COMMANDS: [&str; 2] = ["tldr", "tldrhelp"];

#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub include_bots: bool,
    pub command_prefix: String,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            include_bots: false,
            command_prefix: crate::core::config::DEFAULT_COMMAND_PREFIX.to_string(),
        }
    }
}

/// Whether `content` is an invocation of one of this bot's text commands.
#[must_use]
pub fn is_bot_command(content: &str, prefix: &str) -> bool {
    let Some(rest) = content.trim_start().strip_prefix(prefix) else {
        return false;
    };
    let name = rest.split_whitespace().next().unwrap_or("");
    BOT_COMMANDS
        .iter()
        .any(|cmd| name.eq_ignore_ascii_case(cmd))
}

/// Filters retrieved messages down to the conversation worth summarizing:
/// drops bot authors (unless configured otherwise) and this bot's own
/// command invocations.
#[must_use]
pub fn filter_conversation(
    messages: Vec<HistoryMessage>,
    options: &FilterOptions,
) -> Vec<HistoryMessage> {
    messages
        .into_iter()
        .filter(|msg| {
            let is_from_bot = msg.author_is_bot && !options.include_bots;
            let is_command = !options.command_prefix.is_empty()
                && is_bot_command(&msg.content, &options.command_prefix);
            !is_from_bot && !is_command
        })
        .collect()
}
