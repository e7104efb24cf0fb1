//! Telegram transport: bot setup, dptree handlers and rendering of
//! navigator outcomes.

pub mod bot;
pub mod handlers;
pub mod keyboards;
pub mod render;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use teloxide::Bot;

use teloxide::types::InlineKeyboardButton;
use trailcore::Command as Action;

/// Button that sends the tag of `action` when pressed.
pub fn cb(label: impl Into<String>, action: &Action) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label.into(), action.tag())
}
