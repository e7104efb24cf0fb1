use teloxide::prelude::*;
use teloxide::types::Message;
use trailcore::Event;

use super::types::{identify, HandlerDeps, HandlerError};
use crate::i18n;
use crate::telegram::render;
use crate::telegram::Bot;

/// `/start`: drops the command message, resets the conversation and shows
/// the welcome text with the main menu.
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(from) = msg.from.as_ref() else {
        log::debug!("Ignoring /start without a sender in chat {}", msg.chat.id);
        return Ok(());
    };
    let (user, lang) = identify(from);

    let outcome = deps.navigator.dispatch(user, Event::Start).await;
    render::deliver(bot, msg.chat.id, msg.id, &lang, outcome).await;
    Ok(())
}

pub(super) async fn handle_help_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    let lang = i18n::user_lang(msg.from.as_ref().and_then(|u| u.language_code.as_deref()));
    bot.send_message(msg.chat.id, i18n::t(&lang, "welcome")).await?;
    Ok(())
}
