//! trailbot - Telegram front-end for the trailcore route catalog
//!
//! # Module Structure
//!
//! - `cli`: command line interface
//! - `error`: error type of the binary
//! - `i18n`: Fluent translations (Russian, English)
//! - `logging`: console + file logger
//! - `maintenance`: offline checks of the data directory
//! - `telegram`: bot setup, handler schema, keyboards and rendering

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cli;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod maintenance;
pub mod telegram;

pub use error::{AppError, AppResult};
