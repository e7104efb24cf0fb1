//! Bot construction and the command list shown in Telegram clients.

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use crate::error::{AppError, AppResult};
use crate::i18n::{self, t};
use trailcore::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Я умею:")]
pub enum Command {
    #[command(description = "показывает главное меню")]
    Start,
    #[command(description = "что умеет этот бот")]
    Help,
}

/// Creates a Bot instance with custom or default API URL
///
/// The token comes from `BOT_TOKEN` (or `TELOXIDE_TOKEN`).
pub fn create_bot() -> AppResult<Bot> {
    build_bot(config::BOT_TOKEN.as_str(), config::BOT_API_URL.as_deref())
}

fn build_bot(token: &str, api_url: Option<&str>) -> AppResult<Bot> {
    if token.is_empty() {
        return Err(AppError::Config("BOT_TOKEN environment variable not set".to_string()));
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = match api_url {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(bot_api_url).map_err(|e| AppError::Config(format!("Invalid BOT_API_URL: {}", e)))?;
            Bot::with_client(token, client).set_api_url(url)
        }
        None => Bot::with_client(token, client),
    };

    Ok(bot)
}

/// Command list for one language.
pub fn bot_commands(lang_code: &str) -> Vec<BotCommand> {
    let lang = i18n::lang_from_code(lang_code);
    vec![
        BotCommand::new("start", t(&lang, "cmd-start")),
        BotCommand::new("help", t(&lang, "cmd-help")),
    ]
}

/// Sets up bot commands in Telegram UI: Russian as the default list plus
/// one list per other supported language.
pub async fn setup_bot_commands(bot: &Bot) -> AppResult<()> {
    bot.set_my_commands(bot_commands("ru")).await?;

    for (code, _) in i18n::SUPPORTED_LANGS.iter().filter(|(code, _)| *code != "ru") {
        bot.set_my_commands(bot_commands(code))
            .language_code(code.to_string())
            .await?;
    }

    Ok(())
}
