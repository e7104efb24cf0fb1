//! Per-user conversation state.
//!
//! Sessions live only in memory. They are created lazily on first
//! interaction, dropped on `/start` and evicted after an idle timeout, so a
//! restart forgets every in-progress wizard and cursor.

use moka::future::Cache;
use std::time::Duration;

use crate::config;
use crate::model::{RouteDraft, UserId};
use crate::navigation::command::{ListContext, ReviewTarget};
use crate::navigation::wizard::WizardStep;

/// What the next free-text or photo message from the user means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Browsing,
    Creating(WizardStep),
    WritingReview { history_index: usize },
}

/// Independent pagination index per list context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursors {
    routes: usize,
    search: usize,
    applications: usize,
    history: usize,
    reviews: usize,
}

impl Cursors {
    pub fn get(&self, ctx: ListContext) -> usize {
        match ctx {
            ListContext::Routes => self.routes,
            ListContext::Search => self.search,
            ListContext::Applications => self.applications,
            ListContext::History => self.history,
            ListContext::Reviews => self.reviews,
        }
    }

    pub fn set(&mut self, ctx: ListContext, index: usize) {
        let slot = match ctx {
            ListContext::Routes => &mut self.routes,
            ListContext::Search => &mut self.search,
            ListContext::Applications => &mut self.applications,
            ListContext::History => &mut self.history,
            ListContext::Reviews => &mut self.reviews,
        };
        *slot = index;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub mode: Mode,
    pub draft: RouteDraft,
    pub cursors: Cursors,
    /// Route whose reviews are being paged, for returning to its card
    pub review_target: Option<ReviewTarget>,
}

impl Session {
    /// Leaves the wizard, discarding the draft. Cursors survive.
    pub fn finish_wizard(&mut self) {
        self.mode = Mode::Browsing;
        self.draft = RouteDraft::default();
    }
}

/// Bounded in-memory session map with idle expiry.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<UserId, Session>,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, max_users: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_users)
            .time_to_idle(idle_timeout)
            .build();
        Self { cache }
    }

    /// Store sized from `SESSION_IDLE_SECS` / `SESSION_MAX_USERS`.
    pub fn from_config() -> Self {
        Self::new(config::session::idle_timeout(), *config::session::MAX_USERS)
    }

    /// Current session of `user`, or a fresh one.
    pub async fn get(&self, user: UserId) -> Session {
        self.cache.get(&user).await.unwrap_or_default()
    }

    pub async fn put(&self, user: UserId, session: Session) {
        self.cache.insert(user, session).await;
    }

    pub async fn clear(&self, user: UserId) {
        self.cache.invalidate(&user).await;
    }

    pub async fn contains(&self, user: UserId) -> bool {
        self.cache.get(&user).await.is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
