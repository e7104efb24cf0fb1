use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::time::Instant;
use teloxide::prelude::*;
use teloxide::types::Me;
use teloxide::update_listeners::Polling;
use tokio::time::sleep;

use trailbot::cli::{Cli, Commands};
use trailbot::logging::{init_logger, level_from_str, log_configuration};
use trailbot::maintenance;
use trailbot::telegram::{create_bot, schema, setup_bot_commands, Bot, HandlerDeps};
use trailcore::{config, JsonStore, Navigator, SessionStore};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the selected subcommand.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Load environment variables from .env if present, before config is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH, level_from_str(&config::LOG_LEVEL))?;

    let data_dir = cli.data_dir.unwrap_or_else(config::data_dir);

    match cli.command {
        Some(Commands::Run) => run_bot(data_dir).await,
        Some(Commands::CheckData) => run_check_data(data_dir).await,
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot(data_dir).await
        }
    }
}

/// Run the check-data command
async fn run_check_data(data_dir: PathBuf) -> Result<()> {
    println!("Checking {}", data_dir.display());
    let report = maintenance::check_data(&JsonStore::new(&data_dir)).await?;
    maintenance::print_report(&report);

    let unreadable = report.unreadable().count();
    if unreadable > 0 {
        return Err(anyhow::anyhow!(
            "{} collection file(s) cannot be read; the bot treats them as empty",
            unreadable
        ));
    }
    Ok(())
}

/// Waits until the Bot API answers `getMe`, retrying transient failures.
async fn wait_for_bot_api(bot: &Bot) -> Result<Me> {
    let max_attempts = config::network::STARTUP_ATTEMPTS;
    let mut attempt = 0;
    loop {
        match bot.get_me().await {
            Ok(me) => return Ok(me),
            Err(e) => {
                let err_str = e.to_string();
                let is_retryable = err_str.contains("restart")
                    || err_str.contains("network")
                    || err_str.contains("connection")
                    || err_str.contains("timed out")
                    || err_str.contains("Connection refused");

                attempt += 1;
                if attempt >= max_attempts || !is_retryable {
                    return Err(anyhow::anyhow!(
                        "Failed to connect to Bot API after {} attempt(s): {}",
                        attempt,
                        e
                    ));
                }

                log::warn!(
                    "Bot API not ready (attempt {}/{}): {}. Retrying in {}s...",
                    attempt,
                    max_attempts,
                    err_str,
                    config::network::startup_retry_delay().as_secs()
                );
                sleep(config::network::startup_retry_delay()).await;
            }
        }
    }
}

async fn run_bot(data_dir: PathBuf) -> Result<()> {
    let bot_init_start = Instant::now();
    log::info!("Starting bot...");
    log_configuration(&data_dir);

    let bot = create_bot()?;
    let bot_info = wait_for_bot_api(&bot).await?;
    log::info!("Bot username: {:?}, Bot ID: {}", bot_info.username.as_deref(), bot_info.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let navigator = Navigator::new(JsonStore::new(data_dir), SessionStore::from_config());
    let handler = schema(HandlerDeps::new(navigator));

    log::info!("================================================");
    log::info!("Bot initialization complete in {:.2}s", bot_init_start.elapsed().as_secs_f64());
    log::info!("Ready to receive updates (long polling)");
    log::info!("================================================");

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();
    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
