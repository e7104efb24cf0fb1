//! Logger initialization and start-up diagnostics

use anyhow::Result;
use simplelog::*;
use std::fs::File;
use std::path::Path;

use trailcore::config;

/// Parses a `LOG_LEVEL` value; unknown values fall back to `Info`.
pub fn level_from_str(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Initialize logger for both console and file output
pub fn init_logger(log_file_path: &str, level: LevelFilter) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at start-up.
pub fn log_configuration(data_dir: &Path) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if data_dir.is_dir() {
        log::info!("DATA_DIR: {}", data_dir.display());
    } else {
        log::warn!("DATA_DIR: {} (does not exist yet, created on first save)", data_dir.display());
    }
    match config::BOT_API_URL.as_deref() {
        Some(url) => log::info!("BOT_API_URL: {}", url),
        None => log::info!("BOT_API_URL: default Telegram endpoint"),
    }
    log::info!(
        "Sessions: idle timeout {}s, at most {} users",
        *config::session::IDLE_SECS,
        *config::session::MAX_USERS
    );
    log::info!("Network timeout: {}s", *config::network::TIMEOUT_SECS);
    log::info!("Log file: {} (level {})", *config::LOG_FILE_PATH, *config::LOG_LEVEL);
}
