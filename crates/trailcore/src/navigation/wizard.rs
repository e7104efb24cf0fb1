//! Route creation wizard: photo, title, description, price, location.

use super::dispatcher::{Input, Navigator};
use super::outcome::{CardKind, Notice, Outcome, Prompt, Render};
use crate::error::StorageResult;
use crate::model::{RouteDraft, UserId};
use crate::session::{Mode, Session};
use crate::storage::{Collection, Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Photo,
    Title,
    Description,
    Price,
    Location,
}

impl WizardStep {
    pub const FIRST: Self = Self::Photo;

    /// Following step; `None` after the last one.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Photo => Some(Self::Title),
            Self::Title => Some(Self::Description),
            Self::Description => Some(Self::Price),
            Self::Price => Some(Self::Location),
            Self::Location => None,
        }
    }

    pub fn prompt(self) -> Prompt {
        match self {
            Self::Photo => Prompt::Photo,
            Self::Title => Prompt::Title,
            Self::Description => Prompt::Description,
            Self::Price => Prompt::Price,
            Self::Location => Prompt::Location,
        }
    }
}

/// Result of feeding one message to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// Input stored; ask for the next field
    Advance(WizardStep),
    /// Wrong kind of input; ask for the same field again
    Reprompt(WizardStep),
    /// Last field stored
    Complete,
}

/// Stores `input` into `draft` if `step` accepts it.
pub fn accept(step: WizardStep, draft: &mut RouteDraft, input: Input) -> StepResult {
    let (slot, value) = match (step, input) {
        (WizardStep::Photo, Input::Photo(file_id)) => (&mut draft.photo, file_id),
        (WizardStep::Title, Input::Text(text)) => (&mut draft.title, text),
        (WizardStep::Description, Input::Text(text)) => (&mut draft.description, text),
        (WizardStep::Price, Input::Text(text)) => (&mut draft.price, text),
        (WizardStep::Location, Input::Text(text)) => (&mut draft.location, text),
        _ => return StepResult::Reprompt(step),
    };
    *slot = Some(value);
    advance(step)
}

fn advance(step: WizardStep) -> StepResult {
    match step.next() {
        Some(next) => StepResult::Advance(next),
        None => StepResult::Complete,
    }
}

impl Navigator {
    pub(super) async fn start_wizard(&self, user: UserId) -> StorageResult<Outcome> {
        let mut session = self.sessions().get(user).await;
        session.finish_wizard();
        session.mode = Mode::Creating(WizardStep::FIRST);
        self.sessions().put(user, session).await;
        log::info!("User {} started creating a route", user);
        Ok(Outcome::replace(vec![Render::Prompt(WizardStep::FIRST.prompt())]))
    }

    pub(super) async fn wizard_input(
        &self,
        user: UserId,
        mut session: Session,
        step: WizardStep,
        input: Input,
    ) -> StorageResult<Outcome> {
        match accept(step, &mut session.draft, input) {
            StepResult::Advance(next) => {
                session.mode = Mode::Creating(next);
                self.sessions().put(user, session).await;
                Ok(Outcome::append(vec![Render::Prompt(next.prompt())]))
            }
            StepResult::Reprompt(same) => Ok(Outcome::append(vec![Render::Prompt(same.prompt())])),
            StepResult::Complete => self.commit_route(user, session).await,
        }
    }

    async fn commit_route(&self, user: UserId, mut session: Session) -> StorageResult<Outcome> {
        let draft = std::mem::take(&mut session.draft);
        session.finish_wizard();

        let Some(route) = draft.into_route(user) else {
            log::warn!("User {} reached the end of the wizard with an incomplete draft", user);
            self.sessions().put(user, session).await;
            return Ok(Outcome::notice_then_menu(Notice::RetryLater));
        };

        // Leave the wizard even if a write below fails.
        self.sessions().put(user, session).await;

        self.store().append(Scope::Global, Collection::Routes, route.clone()).await?;
        self.store().append(Scope::User(user), Collection::Routes, route.clone()).await?;
        log::info!("User {} created route {} ({:?})", user, route.id, route.title);

        Ok(Outcome::append(self.card_at(user, CardKind::MyRoute, 0).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_steps_run_in_order() {
        let mut step = WizardStep::FIRST;
        let mut seen = vec![step];
        while let Some(next) = step.next() {
            seen.push(next);
            step = next;
        }
        assert_eq!(
            seen,
            vec![
                WizardStep::Photo,
                WizardStep::Title,
                WizardStep::Description,
                WizardStep::Price,
                WizardStep::Location
            ]
        );
    }

    #[test]
    fn test_photo_step_needs_a_photo() {
        let mut draft = RouteDraft::default();
        assert_eq!(
            accept(WizardStep::Photo, &mut draft, Input::Text("hello".into())),
            StepResult::Reprompt(WizardStep::Photo)
        );
        assert!(draft.photo.is_none());

        assert_eq!(
            accept(WizardStep::Photo, &mut draft, Input::Photo("file-9".into())),
            StepResult::Advance(WizardStep::Title)
        );
        assert_eq!(draft.photo.as_deref(), Some("file-9"));
    }

    #[test]
    fn test_text_steps_ignore_photos() {
        let mut draft = RouteDraft::default();
        assert_eq!(
            accept(WizardStep::Price, &mut draft, Input::Photo("p".into())),
            StepResult::Reprompt(WizardStep::Price)
        );
        assert!(draft.price.is_none());
    }

    #[test]
    fn test_text_steps_accept_anything() {
        let mut draft = RouteDraft::default();
        assert_eq!(
            accept(WizardStep::Price, &mut draft, Input::Text("бесплатно".into())),
            StepResult::Advance(WizardStep::Location)
        );
        assert_eq!(
            accept(WizardStep::Location, &mut draft, Input::Text("".into())),
            StepResult::Complete
        );
        assert_eq!(draft.price.as_deref(), Some("бесплатно"));
        assert_eq!(draft.location.as_deref(), Some(""));
    }
}
