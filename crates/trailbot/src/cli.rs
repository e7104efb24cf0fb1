use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trailbot")]
#[command(author, version, about = "Telegram bot for browsing, creating and booking travel routes", long_about = None)]
pub struct Cli {
    /// Data directory holding global_routes.json and user_data/ (overrides DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot with long polling
    Run,

    /// Load every collection and report record counts and unreadable files
    CheckData,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
