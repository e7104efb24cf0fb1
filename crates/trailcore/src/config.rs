//! Configuration for the bot, read once from the environment.

use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Custom Bot API server URL (local telegram-bot-api)
/// Read from BOT_API_URL environment variable
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| env::var("BOT_API_URL").ok());

/// Root directory for `global_routes.json` and `user_data/`
/// Read from DATA_DIR environment variable
/// Default: current directory
/// Supports tilde (~) expansion for home directory
pub static DATA_DIR: Lazy<String> = Lazy::new(|| env::var("DATA_DIR").unwrap_or_else(|_| ".".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: trailbot.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "trailbot.log".to_string()));

/// Log level (error, warn, info, debug, trace)
/// Read from LOG_LEVEL environment variable
pub static LOG_LEVEL: Lazy<String> = Lazy::new(|| env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

/// Expands `~` in a configured directory.
pub fn expand_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Resolved data directory.
pub fn data_dir() -> PathBuf {
    expand_dir(&DATA_DIR)
}

/// File layout of the JSON store
pub mod files {
    /// Global catalog, relative to the data directory
    pub const GLOBAL_ROUTES_FILE: &str = "global_routes.json";

    /// Parent of the per-user directories
    pub const USER_DATA_DIR: &str = "user_data";

    /// Suffix of the temporary file a save writes before renaming
    pub const TEMP_SUFFIX: &str = "tmp";
}

/// Session store configuration
pub mod session {
    use super::Duration;
    use once_cell::sync::Lazy;
    use std::env;

    /// Default idle time before a session is dropped (1 hour)
    pub const DEFAULT_IDLE_SECS: u64 = 3600;

    /// Default upper bound on concurrently tracked users
    pub const DEFAULT_MAX_USERS: u64 = 10_000;

    /// Idle timeout in seconds
    /// Read from SESSION_IDLE_SECS environment variable
    pub static IDLE_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("SESSION_IDLE_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_IDLE_SECS)
    });

    /// Maximum number of live sessions
    /// Read from SESSION_MAX_USERS environment variable
    pub static MAX_USERS: Lazy<u64> = Lazy::new(|| {
        env::var("SESSION_MAX_USERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_USERS)
    });

    /// Idle timeout duration
    pub fn idle_timeout() -> Duration {
        Duration::from_secs(*IDLE_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;
    use once_cell::sync::Lazy;
    use std::env;

    /// Timeout for Bot API requests (in seconds)
    pub static TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("NETWORK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30)
    });

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(*TIMEOUT_SECS)
    }

    /// Attempts at reaching the Bot API on start-up
    pub const STARTUP_ATTEMPTS: u32 = 12;

    /// Delay between start-up attempts
    pub fn startup_retry_delay() -> Duration {
        Duration::from_secs(5)
    }
}
