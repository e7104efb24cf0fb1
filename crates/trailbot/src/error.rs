use thiserror::Error;
use trailcore::StorageError;

/// Errors of the bot binary.
///
/// Handlers never surface storage failures to Telegram directly: the
/// navigator turns them into a retry notice. What reaches this type is
/// start-up trouble and the maintenance commands.
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// JSON collection errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or invalid settings
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
