//! Writing reviews on history entries and paging through a route's reviews.

use super::command::{ListContext, ReviewTarget};
use super::cursor::{self, Direction};
use super::dispatcher::Navigator;
use super::outcome::{CardKind, Notice, Outcome, Prompt, Render, ReviewPage};
use crate::error::StorageResult;
use crate::model::{Route, UserId};
use crate::session::{Mode, Session};
use crate::storage::{Collection, Scope};

impl Navigator {
    pub(super) async fn request_review(&self, user: UserId, index: usize) -> Outcome {
        let history = self.store().load(Scope::User(user), Collection::History).await;
        let Some(entry) = history.get(index) else {
            return Outcome::notice_then_menu(Notice::NotFound);
        };
        if entry.has_review_from(user) {
            return Outcome::append(vec![Render::Notice(Notice::AlreadyReviewed)]);
        }

        let mut session = self.sessions().get(user).await;
        session.mode = Mode::WritingReview { history_index: index };
        self.sessions().put(user, session).await;
        Outcome::append(vec![Render::Prompt(Prompt::Review)])
    }

    /// Stores `text` as the user's review of history entry `index` and copies
    /// the review map to the route's catalog copies.
    pub(super) async fn submit_review(
        &self,
        user: UserId,
        mut session: Session,
        index: usize,
        text: String,
    ) -> StorageResult<Outcome> {
        session.mode = Mode::Browsing;
        self.sessions().put(user, session).await;

        let scope = Scope::User(user);
        let mut history = self.store().load(scope, Collection::History).await;
        let Some(entry) = history.get_mut(index) else {
            return Ok(Outcome::notice_then_menu(Notice::NotFound));
        };
        if entry.has_review_from(user) {
            return Ok(Outcome::append(vec![
                Render::Notice(Notice::AlreadyReviewed),
                Render::MainMenu,
            ]));
        }

        entry.set_review(user, text);
        let reviewed = entry.clone();
        self.store().save(scope, Collection::History, &history).await?;

        let synced = self.store().replicate_reviews(&reviewed).await?;
        if synced == 0 {
            log::warn!(
                "Review by user {} on route {} has no catalog copy to update",
                user,
                reviewed.id
            );
        }
        log::info!("User {} reviewed route {} ({:?})", user, reviewed.id, reviewed.title);

        let mut renders = vec![Render::Notice(Notice::ReviewSaved)];
        renders.extend(self.card_at(user, CardKind::History, index).await);
        Ok(Outcome::append(renders))
    }

    pub(super) async fn open_reviews(&self, user: UserId, target: ReviewTarget) -> Outcome {
        let Some(route) = self.review_route(user, target).await else {
            return Outcome::notice_then_menu(Notice::NotFound);
        };

        let mut session = self.sessions().get(user).await;
        session.review_target = Some(target);
        session.cursors.set(target.context(), target.index());
        session.cursors.set(ListContext::Reviews, 0);
        self.sessions().put(user, session).await;

        match page(&route, 0) {
            Some(page) => Outcome::replace(vec![Render::Review(page)]),
            None => Outcome::append(vec![Render::Notice(Notice::Empty(ListContext::Reviews))]),
        }
    }

    pub(super) async fn page_reviews(&self, user: UserId, dir: Direction) -> Outcome {
        let mut session = self.sessions().get(user).await;
        let Some(target) = session.review_target else {
            return Outcome::notice_then_menu(Notice::NotFound);
        };
        let Some(route) = self.review_route(user, target).await else {
            return Outcome::notice_then_menu(Notice::NotFound);
        };

        let current = session.cursors.get(ListContext::Reviews);
        let Some(index) = cursor::step(current, dir, route.reviews.len()) else {
            return Outcome::append(vec![Render::Notice(Notice::Empty(ListContext::Reviews))]);
        };
        session.cursors.set(ListContext::Reviews, index);
        self.sessions().put(user, session).await;

        match page(&route, index) {
            Some(page) => Outcome::replace(vec![Render::Review(page)]),
            None => Outcome::append(vec![Render::Notice(Notice::Empty(ListContext::Reviews))]),
        }
    }

    /// Returns to the card whose reviews were open.
    pub(super) async fn back_to_route(&self, user: UserId) -> Outcome {
        let mut session = self.sessions().get(user).await;
        let Some(target) = session.review_target.take() else {
            return Outcome::replace(vec![Render::MainMenu]);
        };
        self.sessions().put(user, session).await;
        Outcome::replace(self.card_at(user, card_kind(target), target.index()).await)
    }

    async fn review_route(&self, user: UserId, target: ReviewTarget) -> Option<Route> {
        self.load(user, card_kind(target)).await.into_iter().nth(target.index())
    }
}

fn card_kind(target: ReviewTarget) -> CardKind {
    match target {
        ReviewTarget::Search(_) => CardKind::Search,
        ReviewTarget::History(_) => CardKind::History,
    }
}

fn page(route: &Route, index: usize) -> Option<ReviewPage> {
    let texts = route.review_texts();
    let text = texts.get(index)?;
    Some(ReviewPage {
        route_title: route.title.clone(),
        index,
        total: texts.len(),
        text: text.to_string(),
    })
}
