//! Turns navigator outcomes into Telegram messages.

use fluent_templates::fluent_bundle::FluentArgs;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, MessageId};
use trailcore::navigation::{Card, CardKind, Notice, Prompt, ReviewPage};
use trailcore::{Outcome, Render};
use unic_langid::LanguageIdentifier;

use super::keyboards;
use crate::i18n::{t, t_args};
use crate::telegram::Bot;

/// Bot API limit on message text, in UTF-16 code units
pub const MAX_TEXT_LEN: usize = 4096;

/// Applies an outcome in reply to the message `trigger`.
///
/// Deletion of the trigger is best effort. Rendering stops at the first
/// failed send, after one attempt at sending the retry notice with the main
/// menu attached.
pub async fn deliver(bot: &Bot, chat_id: ChatId, trigger: MessageId, lang: &LanguageIdentifier, outcome: Outcome) {
    if outcome.remove_prior {
        if let Err(e) = bot.delete_message(chat_id, trigger).await {
            log::debug!("Could not delete message {} in chat {}: {}", trigger.0, chat_id, e);
        }
    }

    for render in &outcome.renders {
        if let Err(e) = send_render(bot, chat_id, lang, render).await {
            log::error!("Failed to send {} to chat {}: {}", render_name(render), chat_id, e);
            let _ = bot
                .send_message(chat_id, t(lang, "notice-retry-later"))
                .reply_markup(keyboards::main_menu(lang))
                .await;
            break;
        }
    }
}

pub async fn send_render(
    bot: &Bot,
    chat_id: ChatId,
    lang: &LanguageIdentifier,
    render: &Render,
) -> ResponseResult<()> {
    match render {
        Render::Welcome => {
            bot.send_message(chat_id, t(lang, "welcome")).await?;
        }
        Render::MainMenu => {
            bot.send_message(chat_id, t(lang, "main-menu-title"))
                .reply_markup(keyboards::main_menu(lang))
                .await?;
        }
        Render::RoutesMenu => {
            bot.send_message(chat_id, t(lang, "routes-menu-title"))
                .reply_markup(keyboards::routes_menu(lang))
                .await?;
        }
        Render::Card(card) => send_card(bot, chat_id, lang, card).await?,
        Render::Review(page) => {
            bot.send_message(chat_id, review_text(lang, page))
                .reply_markup(keyboards::review_page(lang))
                .await?;
        }
        Render::Prompt(prompt) => {
            bot.send_message(chat_id, t(lang, prompt_key(*prompt))).await?;
        }
        Render::Notice(notice) => {
            bot.send_message(chat_id, notice_text(lang, notice)).await?;
        }
    }
    Ok(())
}

/// Photo card; falls back to a text card when the photo cannot be sent
/// (stale file id, caption over the photo limit).
async fn send_card(bot: &Bot, chat_id: ChatId, lang: &LanguageIdentifier, card: &Card) -> ResponseResult<()> {
    let text = caption(lang, card);
    let keyboard = keyboards::card(lang, card);
    let photo = InputFile::file_id(FileId(card.route.photo.clone()));

    let sent = bot
        .send_photo(chat_id, photo)
        .caption(text.clone())
        .reply_markup(keyboard.clone())
        .await;
    if let Err(e) = sent {
        log::warn!("Failed to send photo of route {}: {}. Sending text card", card.route.id, e);
        bot.send_message(chat_id, truncate_text(&text, MAX_TEXT_LEN))
            .reply_markup(keyboard)
            .await?;
    }
    Ok(())
}

/// Cuts `text` to at most `limit` UTF-16 code units, ending with an ellipsis
/// when anything was dropped.
pub fn truncate_text(text: &str, limit: usize) -> String {
    if text.encode_utf16().count() <= limit {
        return text.to_string();
    }
    let budget = limit.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        used += ch.len_utf16();
        if used > budget {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

pub fn caption(lang: &LanguageIdentifier, card: &Card) -> String {
    let route = &card.route;
    let mut args = FluentArgs::new();
    args.set("title", route.title.clone());
    args.set("description", route.description.clone());
    args.set("price", route.price.clone());
    args.set("location", route.location.clone());
    let mut text = t_args(lang, "card-caption", &args);

    if card.kind == CardKind::History {
        let review = card
            .viewer_review
            .clone()
            .unwrap_or_else(|| t(lang, "card-no-review"));
        let mut args = FluentArgs::new();
        args.set("review", review);
        text.push('\n');
        text.push_str(&t_args(lang, "card-own-review", &args));
    }
    text
}

pub fn review_text(lang: &LanguageIdentifier, page: &ReviewPage) -> String {
    let mut args = FluentArgs::new();
    args.set("title", page.route_title.clone());
    args.set("position", (page.index + 1).to_string());
    args.set("total", page.total.to_string());
    args.set("text", page.text.clone());
    t_args(lang, "review-page", &args)
}

pub fn prompt_key(prompt: Prompt) -> &'static str {
    match prompt {
        Prompt::Photo => "prompt-photo",
        Prompt::Title => "prompt-title",
        Prompt::Description => "prompt-description",
        Prompt::Price => "prompt-price",
        Prompt::Location => "prompt-location",
        Prompt::Review => "prompt-review",
    }
}

pub fn notice_text(lang: &LanguageIdentifier, notice: &Notice) -> String {
    let key = match notice {
        Notice::NotFound => "notice-not-found",
        Notice::Empty(ctx) => return t(lang, &format!("notice-empty-{}", ctx)),
        Notice::TravelAdded => "notice-travel-added",
        Notice::ApplicationConfirmed => "notice-app-confirmed",
        Notice::ApplicationRejected => "notice-app-rejected",
        Notice::AlreadyReviewed => "notice-already-reviewed",
        Notice::ReviewSaved => "notice-review-saved",
        Notice::UnknownCommand(tag) => {
            let mut args = FluentArgs::new();
            args.set("tag", tag.clone());
            return t_args(lang, "notice-unknown-command", &args);
        }
        Notice::UnknownMessage => "notice-unknown-message",
        Notice::RetryLater => "notice-retry-later",
    };
    t(lang, key)
}

fn render_name(render: &Render) -> &'static str {
    match render {
        Render::Welcome => "welcome",
        Render::MainMenu => "main menu",
        Render::RoutesMenu => "routes menu",
        Render::Card(_) => "route card",
        Render::Review(_) => "review page",
        Render::Prompt(_) => "prompt",
        Render::Notice(_) => "notice",
    }
}
