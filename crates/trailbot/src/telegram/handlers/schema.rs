//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;
use trailcore::{Event, Input};

use super::commands::{handle_help_command, handle_start_command};
use super::types::{identify, HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::render;
use crate::telegram::Bot;

/// Creates the main dispatcher schema for the Telegram bot.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);
                match cmd {
                    Command::Start => handle_start_command(&bot, &msg, &deps).await?,
                    Command::Help => handle_help_command(&bot, &msg).await?,
                }
                Ok(())
            }
        },
    ))
}

/// Wizard answers and review texts.
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_map(|msg: Message| input_from_message(&msg))
        .endpoint(move |bot: Bot, msg: Message, input: Input| {
            let deps = deps.clone();
            async move {
                let Some(from) = msg.from.as_ref() else {
                    return Ok(());
                };
                let (user, lang) = identify(from);
                let outcome = deps.navigator.dispatch(user, Event::Input(input)).await;
                render::deliver(&bot, msg.chat.id, msg.id, &lang, outcome).await;
                Ok(())
            }
        })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            let _ = bot.answer_callback_query(q.id.clone()).await;

            let chat_id = q.message.as_ref().map(|m| m.chat().id);
            let message_id = q.message.as_ref().map(|m| m.id());
            let (Some(data), Some(chat_id), Some(message_id)) = (q.data.clone(), chat_id, message_id) else {
                log::debug!("Ignoring callback {:?} without data or message", q.id);
                return Ok(());
            };

            let (user, lang) = identify(&q.from);
            let outcome = deps.navigator.dispatch(user, Event::Callback(data)).await;
            render::deliver(&bot, chat_id, message_id, &lang, outcome).await;
            Ok(())
        }
    })
}

/// Navigator input carried by a message: the largest photo size, or plain
/// text. Slash commands are not input.
pub fn input_from_message(msg: &Message) -> Option<Input> {
    if let Some(photos) = msg.photo() {
        return photos
            .iter()
            .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
            .map(|p| Input::Photo(p.file.id.0.clone()));
    }
    match msg.text() {
        Some(text) if !text.starts_with('/') => Some(Input::Text(text.to_string())),
        _ => None,
    }
}
