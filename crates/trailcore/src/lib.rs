//! trailcore - route catalog engine behind the trailbot Telegram bot
//!
//! Everything here is transport independent: the bot crate turns Telegram
//! updates into [`navigation::Event`]s and renders the returned
//! [`navigation::Outcome`].
//!
//! # Module Structure
//!
//! - `config`: environment driven settings
//! - `error`: storage error type
//! - `model`: routes, drafts and review maps
//! - `storage`: per-user and global JSON collections
//! - `session`: per-user ephemeral state with idle expiry
//! - `navigation`: command codec, cursors, dispatcher, wizard and reviews

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod error;
pub mod model;
pub mod navigation;
pub mod session;
pub mod storage;

// Re-export commonly used types for convenience
pub use error::StorageError;
pub use model::{Route, RouteDraft, RouteId, UserId};
pub use navigation::{Command, Event, Input, Navigator, Outcome, Render};
pub use session::{Session, SessionStore};
pub use storage::{Collection, JsonStore, Scope};
