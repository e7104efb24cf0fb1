//! Telegram bot handler tree configuration
//!
//! The same schema runs in production and in `tests/handlers.rs`.

mod commands;
mod schema;
mod types;

pub use schema::{input_from_message, schema};
pub use types::{HandlerDeps, HandlerError};
