//! Telegram layer against a mocked Bot API (wiremock).
//!
//! Covers the real rendering code and the dptree schema; no network access.
//!
//! Run with: cargo test -p trailbot --test handlers

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::time::Duration;

use serde_json::{json, Value};
use teloxide::types::{ChatId, Me, Message, MessageId, Update};
use teloxide::Bot;
use tempfile::TempDir;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use trailbot::i18n::{lang_from_code, t};
use trailbot::telegram::handlers::input_from_message;
use trailbot::telegram::render::{self, MAX_TEXT_LEN};
use trailbot::telegram::{schema, HandlerDeps};
use trailcore::navigation::{Card, CardKind, Notice};
use trailcore::{Collection, Input, JsonStore, Navigator, Outcome, Render, Route, RouteId, Scope, SessionStore};

const CHAT_ID: i64 = 123456789;
const USER_ID: u64 = 123456789;
const BOT_ID: u64 = 987654321;

/// Mock server, a bot pointed at it and a navigator over a temp data dir
struct TelegramHarness {
    server: MockServer,
    bot: Bot,
    navigator: Navigator,
    _dir: TempDir,
}

impl TelegramHarness {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let bot = Bot::new("test_token_12345:ABCDEF").set_api_url(server.uri().parse().unwrap());
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let navigator = Navigator::new(
            JsonStore::new(dir.path()),
            SessionStore::new(Duration::from_secs(60), 100),
        );
        Self {
            server,
            bot,
            navigator,
            _dir: dir,
        }
    }

    /// Answers `api_method` with a successful result
    async fn mock_ok(&self, api_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(path_regex(format!("(?i)/bot[^/]+/{}$", api_method)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": result })))
            .mount(&self.server)
            .await;
    }

    /// Answers `api_method` with a Bot API error
    async fn mock_fail(&self, api_method: &str, description: &str) {
        Mock::given(method("POST"))
            .and(path_regex(format!("(?i)/bot[^/]+/{}$", api_method)))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": description
            })))
            .mount(&self.server)
            .await;
    }

    async fn mock_send_message_ok(&self) {
        self.mock_ok("sendMessage", sent_message(json!({ "text": "Response" }))).await;
    }

    async fn mock_send_photo_ok(&self) {
        self.mock_ok(
            "sendPhoto",
            sent_message(json!({
                "photo": [{ "file_id": "photo_id", "file_unique_id": "uid", "width": 100, "height": 100 }]
            })),
        )
        .await;
    }

    async fn requests_to(&self, api_method: &str) -> Vec<Request> {
        let suffix = format!("/{}", api_method.to_lowercase());
        self.server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path().to_lowercase().ends_with(&suffix))
            .collect()
    }

    async fn sent_texts(&self) -> Vec<Value> {
        self.requests_to("sendMessage")
            .await
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("sendMessage body should be JSON"))
            .collect()
    }

    fn deps(&self) -> HandlerDeps {
        HandlerDeps::new(self.navigator.clone())
    }
}

/// A message the bot "sent", with `extra` merged in
fn sent_message(extra: Value) -> Value {
    let mut message = json!({
        "message_id": 42,
        "from": { "id": BOT_ID, "is_bot": true, "first_name": "TestBot", "username": "test_bot" },
        "chat": { "id": CHAT_ID, "type": "private", "first_name": "Test" },
        "date": 1735992000
    });
    if let (Some(target), Some(extra)) = (message.as_object_mut(), extra.as_object()) {
        target.extend(extra.clone());
    }
    message
}

/// A message from the user, with `content` merged in
fn user_message(content: Value) -> Value {
    let mut message = json!({
        "message_id": 7,
        "date": 1735992000,
        "chat": { "id": CHAT_ID, "type": "private", "first_name": "Test", "username": "testuser" },
        "from": {
            "id": USER_ID,
            "is_bot": false,
            "first_name": "Test",
            "username": "testuser",
            "language_code": "ru"
        }
    });
    if let (Some(target), Some(content)) = (message.as_object_mut(), content.as_object()) {
        target.extend(content.clone());
    }
    message
}

fn me() -> Me {
    serde_json::from_value(json!({
        "id": BOT_ID,
        "is_bot": true,
        "first_name": "TestBot",
        "username": "test_bot",
        "can_join_groups": true,
        "can_read_all_group_messages": false,
        "supports_inline_queries": false,
        "has_main_web_app": false
    }))
    .expect("Failed to deserialize Me")
}

fn message_update(content: Value) -> Update {
    serde_json::from_str(&json!({ "update_id": 1, "message": user_message(content) }).to_string())
        .expect("Failed to deserialize message update")
}

fn callback_update(data: &str) -> Update {
    serde_json::from_str(&json!({
        "update_id": 2,
        "callback_query": {
            "id": "callback_123",
            "from": {
                "id": USER_ID,
                "is_bot": false,
                "first_name": "Test",
                "language_code": "ru"
            },
            "message": sent_message(json!({ "text": "Главное меню:" })),
            "chat_instance": "chat_instance_123",
            "data": data
        }
    }).to_string())
    .expect("Failed to deserialize callback update")
}

fn coast_trail() -> Route {
    Route {
        id: RouteId::generate(),
        owner: None,
        photo: "AgACAgIAAxkBAAIC-coast".to_string(),
        title: "Coast Trail".to_string(),
        description: "Cliffs, coves and a lighthouse".to_string(),
        price: "1500".to_string(),
        location: "Crimea".to_string(),
        reviews: BTreeMap::new(),
    }
}

fn search_card(route: Route) -> Render {
    Render::Card(Card {
        kind: CardKind::Search,
        index: 0,
        total: 1,
        route,
        viewer_review: None,
    })
}

fn callback_data(body: &Value) -> Vec<String> {
    body["reply_markup"]["inline_keyboard"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|button| button["callback_data"].as_str().map(str::to_string))
        .collect()
}

// ==================== render::deliver ====================

#[tokio::test]
async fn test_failed_delete_does_not_stop_rendering() {
    let h = TelegramHarness::new().await;
    h.mock_fail("deleteMessage", "Bad Request: message can't be deleted").await;
    h.mock_send_message_ok().await;

    let lang = lang_from_code("ru");
    let outcome = Outcome::replace(vec![Render::MainMenu]);
    render::deliver(&h.bot, ChatId(CHAT_ID), MessageId(42), &lang, outcome).await;

    assert_eq!(h.requests_to("deleteMessage").await.len(), 1);
    let texts = h.sent_texts().await;
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0]["text"], "Главное меню:");
    assert!(callback_data(&texts[0]).contains(&"menu:search".to_string()));
}

#[tokio::test]
async fn test_appended_outcome_keeps_trigger_message() {
    let h = TelegramHarness::new().await;
    h.mock_ok("deleteMessage", json!(true)).await;
    h.mock_send_message_ok().await;

    let lang = lang_from_code("en");
    let outcome = Outcome::append(vec![Render::Notice(Notice::TravelAdded), Render::MainMenu]);
    render::deliver(&h.bot, ChatId(CHAT_ID), MessageId(42), &lang, outcome).await;

    assert!(h.requests_to("deleteMessage").await.is_empty());
    let texts = h.sent_texts().await;
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0]["text"].as_str(), Some(t(&lang, "notice-travel-added").as_str()));
    assert_eq!(texts[1]["text"], "Main menu:");
}

#[tokio::test]
async fn test_card_photo_is_sent_with_buttons() {
    let h = TelegramHarness::new().await;
    h.mock_ok("deleteMessage", json!(true)).await;
    h.mock_send_photo_ok().await;
    h.mock_send_message_ok().await;

    let lang = lang_from_code("ru");
    let outcome = Outcome::replace(vec![search_card(coast_trail())]);
    render::deliver(&h.bot, ChatId(CHAT_ID), MessageId(42), &lang, outcome).await;

    assert_eq!(h.requests_to("sendPhoto").await.len(), 1);
    assert!(h.sent_texts().await.is_empty());
}

#[tokio::test]
async fn test_failed_photo_falls_back_to_text_card() {
    let h = TelegramHarness::new().await;
    h.mock_ok("deleteMessage", json!(true)).await;
    h.mock_fail("sendPhoto", "Bad Request: wrong file identifier/HTTP URL specified").await;
    h.mock_send_message_ok().await;

    let lang = lang_from_code("ru");
    let outcome = Outcome::replace(vec![search_card(coast_trail())]);
    render::deliver(&h.bot, ChatId(CHAT_ID), MessageId(42), &lang, outcome).await;

    assert_eq!(h.requests_to("sendPhoto").await.len(), 1);
    let texts = h.sent_texts().await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0]["text"].as_str().unwrap().starts_with("Название: Coast Trail\n"));
    assert_eq!(
        callback_data(&texts[0]),
        vec!["nav:search:prev", "nav:search:next", "travel:0", "menu:main"]
    );
}

#[tokio::test]
async fn test_text_card_fits_message_limit() {
    let h = TelegramHarness::new().await;
    h.mock_ok("deleteMessage", json!(true)).await;
    h.mock_fail("sendPhoto", "Bad Request: message caption is too long").await;
    h.mock_send_message_ok().await;

    let mut route = coast_trail();
    route.description = "Очень длинное описание. ".repeat(400);
    let lang = lang_from_code("ru");
    render::deliver(
        &h.bot,
        ChatId(CHAT_ID),
        MessageId(42),
        &lang,
        Outcome::replace(vec![search_card(route)]),
    )
    .await;

    let texts = h.sent_texts().await;
    assert_eq!(texts.len(), 1);
    let text = texts[0]["text"].as_str().unwrap();
    assert!(text.encode_utf16().count() <= MAX_TEXT_LEN);
    assert!(text.ends_with('…'));
}

#[tokio::test]
async fn test_failed_send_leaves_one_retry_notice_with_menu() {
    let h = TelegramHarness::new().await;
    h.mock_ok("deleteMessage", json!(true)).await;
    h.mock_fail("sendPhoto", "Bad Request: wrong file identifier/HTTP URL specified").await;
    h.mock_fail("sendMessage", "Bad Request: message is too long").await;

    let lang = lang_from_code("ru");
    let outcome = Outcome::replace(vec![search_card(coast_trail()), Render::MainMenu]);
    render::deliver(&h.bot, ChatId(CHAT_ID), MessageId(42), &lang, outcome).await;

    let retry_text = t(&lang, "notice-retry-later");
    let texts = h.sent_texts().await;
    let retries: Vec<&Value> = texts.iter().filter(|b| b["text"].as_str() == Some(retry_text.as_str())).collect();
    assert_eq!(retries.len(), 1, "sent: {:?}", texts);
    assert!(callback_data(retries[0]).contains(&"menu:search".to_string()));

    // Rendering stopped: the menu after the card was never attempted.
    assert!(texts.iter().all(|b| b["text"] != "Главное меню:"));
    assert_eq!(texts.len(), 2);
}

// ==================== schema ====================

#[tokio::test]
async fn test_callback_opens_search_card() {
    let h = TelegramHarness::new().await;
    h.mock_ok("answerCallbackQuery", json!(true)).await;
    h.mock_ok("deleteMessage", json!(true)).await;
    h.mock_send_photo_ok().await;
    h.navigator
        .store()
        .save(Scope::Global, Collection::Routes, &[coast_trail()])
        .await
        .unwrap();

    let result = schema(h.deps())
        .dispatch(teloxide::dptree::deps![h.bot.clone(), me(), callback_update("menu:search")])
        .await;
    assert!(matches!(result, ControlFlow::Break(Ok(()))));

    assert_eq!(h.requests_to("answerCallbackQuery").await.len(), 1);
    assert_eq!(h.requests_to("deleteMessage").await.len(), 1);
    assert_eq!(h.requests_to("sendPhoto").await.len(), 1);
}

#[tokio::test]
async fn test_start_command_sends_welcome_and_menu() {
    let h = TelegramHarness::new().await;
    h.mock_ok("deleteMessage", json!(true)).await;
    h.mock_send_message_ok().await;

    let result = schema(h.deps())
        .dispatch(teloxide::dptree::deps![h.bot.clone(), me(), message_update(json!({ "text": "/start" }))])
        .await;
    assert!(matches!(result, ControlFlow::Break(Ok(()))));

    let lang = lang_from_code("ru");
    assert_eq!(h.requests_to("deleteMessage").await.len(), 1);
    let texts = h.sent_texts().await;
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0]["text"].as_str(), Some(t(&lang, "welcome").as_str()));
    assert_eq!(texts[1]["text"], "Главное меню:");
}

#[tokio::test]
async fn test_free_text_without_flow_is_unknown_message() {
    let h = TelegramHarness::new().await;
    h.mock_ok("deleteMessage", json!(true)).await;
    h.mock_send_message_ok().await;

    let result = schema(h.deps())
        .dispatch(teloxide::dptree::deps![h.bot.clone(), me(), message_update(json!({ "text": "привет" }))])
        .await;
    assert!(matches!(result, ControlFlow::Break(Ok(()))));

    assert!(h.requests_to("deleteMessage").await.is_empty());
    let texts = h.sent_texts().await;
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0]["text"], "Неизвестное сообщение.");
}

// ==================== input_from_message ====================

#[test]
fn test_input_takes_largest_photo() {
    let msg: Message = serde_json::from_value(user_message(json!({
        "photo": [
            { "file_id": "small", "file_unique_id": "u1", "width": 90, "height": 60 },
            { "file_id": "large", "file_unique_id": "u3", "width": 1280, "height": 853 },
            { "file_id": "medium", "file_unique_id": "u2", "width": 320, "height": 213 }
        ]
    })))
    .unwrap();
    assert_eq!(input_from_message(&msg), Some(Input::Photo("large".to_string())));
}

#[test]
fn test_input_text_but_not_commands() {
    let text: Message = serde_json::from_value(user_message(json!({ "text": "Алтай" }))).unwrap();
    assert_eq!(input_from_message(&text), Some(Input::Text("Алтай".to_string())));

    let command: Message = serde_json::from_value(user_message(json!({ "text": "/help" }))).unwrap();
    assert_eq!(input_from_message(&command), None);
}
