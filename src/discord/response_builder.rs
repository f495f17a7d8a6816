//! Converts rendered [`Reply`] values into Discord embeds.

use poise::serenity_prelude as serenity;

use crate::core::models::Reply;

/// Build an embed carrying the reply's title, text, fields and colour.
///
/// # Examples
///
/// ```
/// use tldr::discord::response_builder::create_embed;
/// use tldr::features::render::render_help;
///
/// let embed = create_embed(&render_help("!"));
/// ```
#[must_use]
pub fn create_embed(reply: &Reply) -> serenity::CreateEmbed {
    reply.fields.iter().fold(
        serenity::CreateEmbed::new()
            .title(&reply.title)
            .description(&reply.description)
            .colour(reply.color)
            .timestamp(serenity::Timestamp::now()),
        |embed, f| embed.field(&f.name, &f.value, f.inline),
    )
}

#[must_use]
pub fn create_reply(reply: &Reply) -> poise::CreateReply {
    poise::CreateReply::default().embed(create_embed(reply))
}
