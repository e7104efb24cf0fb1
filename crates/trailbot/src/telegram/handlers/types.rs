//! Handler types and dependencies

use teloxide::types::User;
use trailcore::{Navigator, UserId};
use unic_langid::LanguageIdentifier;

use crate::i18n;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub navigator: Navigator,
}

impl HandlerDeps {
    pub fn new(navigator: Navigator) -> Self {
        Self { navigator }
    }
}

/// Navigator identity and interface language of a Telegram user.
pub(super) fn identify(user: &User) -> (UserId, LanguageIdentifier) {
    (UserId(user.id.0), i18n::user_lang(user.language_code.as_deref()))
}
