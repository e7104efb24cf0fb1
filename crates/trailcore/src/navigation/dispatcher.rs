//! Menu dispatcher: one event in, one [`Outcome`] out.

use super::command::{Command, ListContext};
use super::cursor::{self, Direction};
use super::outcome::{Card, CardKind, Notice, Outcome, Prompt, Render};
use crate::error::StorageResult;
use crate::model::{Route, UserId};
use crate::session::{Mode, SessionStore};
use crate::storage::{Collection, JsonStore, Scope};

/// A message the user typed or uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    /// Telegram file id of the largest photo size
    Photo(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `/start`
    Start,
    /// Button press carrying a raw tag
    Callback(String),
    Input(Input),
}

/// Routes user events to storage and session updates.
///
/// Cheap to clone; clones share the session cache.
#[derive(Debug, Clone)]
pub struct Navigator {
    store: JsonStore,
    sessions: SessionStore,
}

impl Navigator {
    pub fn new(store: JsonStore, sessions: SessionStore) -> Self {
        Self { store, sessions }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handles one event. Storage write failures are logged and turned into
    /// a retry notice; this never fails.
    pub async fn dispatch(&self, user: UserId, event: Event) -> Outcome {
        match self.handle(user, event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Failed to handle update from user {}: {}", user, e);
                Outcome::notice_then_menu(Notice::RetryLater)
            }
        }
    }

    async fn handle(&self, user: UserId, event: Event) -> StorageResult<Outcome> {
        match event {
            Event::Start => {
                self.sessions.clear(user).await;
                Ok(Outcome::replace(vec![Render::Welcome, Render::MainMenu]))
            }
            Event::Callback(tag) => self.execute(user, Command::parse(&tag)).await,
            Event::Input(input) => self.on_input(user, input).await,
        }
    }

    /// Runs a decoded command.
    pub async fn execute(&self, user: UserId, command: Command) -> StorageResult<Outcome> {
        log::debug!("User {} -> {:?}", user, command);
        match command {
            Command::MainMenu => Ok(Outcome::replace(vec![Render::MainMenu])),
            Command::RoutesMenu => Ok(Outcome::replace(vec![Render::RoutesMenu])),
            Command::MyRoutes => Ok(self.open_list(user, CardKind::MyRoute).await),
            Command::Search => Ok(self.open_list(user, CardKind::Search).await),
            Command::Applications => Ok(self.open_list(user, CardKind::Application).await),
            Command::History => Ok(self.open_list(user, CardKind::History).await),
            Command::CreateRoute => self.start_wizard(user).await,
            Command::Navigate(ListContext::Reviews, dir) => Ok(self.page_reviews(user, dir).await),
            Command::Navigate(ctx, dir) => Ok(self.navigate(user, ctx, dir).await),
            Command::Travel(index) => self.travel(user, index).await,
            Command::Confirm(index) => self.confirm(user, index).await,
            Command::Reject(index) => self.reject(user, index).await,
            Command::WriteReview(index) => Ok(self.request_review(user, index).await),
            Command::ShowReviews(target) => Ok(self.open_reviews(user, target).await),
            Command::BackToRoute => Ok(self.back_to_route(user).await),
            Command::Unknown(tag) => {
                log::warn!("User {} pressed unknown button {:?}", user, tag);
                Ok(Outcome::append(vec![Render::Notice(Notice::UnknownCommand(tag))]))
            }
        }
    }

    async fn on_input(&self, user: UserId, input: Input) -> StorageResult<Outcome> {
        let session = self.sessions.get(user).await;
        match (session.mode, input) {
            (Mode::Creating(step), input) => self.wizard_input(user, session, step, input).await,
            (Mode::WritingReview { history_index }, Input::Text(text)) => {
                self.submit_review(user, session, history_index, text).await
            }
            (Mode::WritingReview { .. }, Input::Photo(_)) => {
                Ok(Outcome::append(vec![Render::Prompt(Prompt::Review)]))
            }
            (Mode::Browsing, _) => Ok(Outcome::append(vec![Render::Notice(Notice::UnknownMessage)])),
        }
    }

    async fn open_list(&self, user: UserId, kind: CardKind) -> Outcome {
        Outcome::replace(self.card_at(user, kind, 0).await)
    }

    async fn navigate(&self, user: UserId, ctx: ListContext, dir: Direction) -> Outcome {
        let Some(kind) = CardKind::for_context(ctx) else {
            return Outcome::notice_then_menu(Notice::NotFound);
        };
        let routes = self.load(user, kind).await;
        let current = self.sessions.get(user).await.cursors.get(ctx);
        match cursor::step(current, dir, routes.len()) {
            Some(index) => Outcome::replace(self.show(user, kind, index, routes).await),
            None => Outcome::replace(empty(ctx)),
        }
    }

    /// Card at `index` of the list behind `kind` (wrapped into range), or the
    /// empty-state view. Stores the shown index as that list's cursor.
    pub(super) async fn card_at(&self, user: UserId, kind: CardKind, index: usize) -> Vec<Render> {
        let routes = self.load(user, kind).await;
        match cursor::clamp(index, routes.len()) {
            Some(index) => self.show(user, kind, index, routes).await,
            None => empty(kind.context()),
        }
    }

    async fn show(&self, user: UserId, kind: CardKind, index: usize, routes: Vec<Route>) -> Vec<Render> {
        let total = routes.len();
        let Some(route) = routes.into_iter().nth(index) else {
            return empty(kind.context());
        };

        let mut session = self.sessions.get(user).await;
        session.cursors.set(kind.context(), index);
        self.sessions.put(user, session).await;

        let viewer_review = match kind {
            CardKind::History => route.review_of(user).map(str::to_string),
            _ => None,
        };
        vec![Render::Card(Card {
            kind,
            index,
            total,
            route,
            viewer_review,
        })]
    }

    pub(super) async fn load(&self, user: UserId, kind: CardKind) -> Vec<Route> {
        let (scope, collection) = source(kind, user);
        self.store.load(scope, collection).await
    }

    async fn travel(&self, user: UserId, index: usize) -> StorageResult<Outcome> {
        let catalog = self.store.load(Scope::Global, Collection::Routes).await;
        let Some(route) = catalog.into_iter().nth(index) else {
            return Ok(Outcome::notice_then_menu(Notice::NotFound));
        };

        log::info!("User {} applied for route {} ({:?})", user, route.id, route.title);
        self.store
            .append(Scope::User(user), Collection::Applications, route)
            .await?;
        Ok(Outcome::append(vec![Render::Notice(Notice::TravelAdded), Render::MainMenu]))
    }

    async fn confirm(&self, user: UserId, index: usize) -> StorageResult<Outcome> {
        let scope = Scope::User(user);
        let applications = self.store.load(scope, Collection::Applications).await;
        let Some(application) = applications.get(index).cloned() else {
            return Ok(Outcome::notice_then_menu(Notice::NotFound));
        };

        // History first: a failure between the two writes duplicates rather than loses.
        let len = self.store.append(scope, Collection::History, application).await?;
        self.store.remove(scope, Collection::Applications, index).await?;
        log::info!("User {} confirmed application {}", user, index);

        let mut renders = vec![Render::Notice(Notice::ApplicationConfirmed)];
        renders.extend(self.card_at(user, CardKind::History, len.saturating_sub(1)).await);
        Ok(Outcome::replace(renders))
    }

    async fn reject(&self, user: UserId, index: usize) -> StorageResult<Outcome> {
        let removed = self
            .store
            .remove(Scope::User(user), Collection::Applications, index)
            .await?;
        if removed.is_none() {
            return Ok(Outcome::notice_then_menu(Notice::NotFound));
        }
        log::info!("User {} rejected application {}", user, index);
        Ok(Outcome::notice_then_menu(Notice::ApplicationRejected))
    }
}

fn source(kind: CardKind, user: UserId) -> (Scope, Collection) {
    match kind {
        CardKind::MyRoute => (Scope::User(user), Collection::Routes),
        CardKind::Search => (Scope::Global, Collection::Routes),
        CardKind::Application => (Scope::User(user), Collection::Applications),
        CardKind::History => (Scope::User(user), Collection::History),
    }
}

fn empty(ctx: ListContext) -> Vec<Render> {
    vec![Render::Notice(Notice::Empty(ctx)), Render::MainMenu]
}
