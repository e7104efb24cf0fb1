//! What the dispatcher asks the transport to show.

use super::command::ListContext;
use crate::model::Route;

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Delete the message that triggered the event before rendering
    pub remove_prior: bool,
    /// Messages to send, in order
    pub renders: Vec<Render>,
}

impl Outcome {
    /// Replaces the triggering message with `renders`.
    pub fn replace(renders: Vec<Render>) -> Self {
        Self {
            remove_prior: true,
            renders,
        }
    }

    /// Sends `renders` below the triggering message.
    pub fn append(renders: Vec<Render>) -> Self {
        Self {
            remove_prior: false,
            renders,
        }
    }

    /// Notice followed by the main menu, replacing the prior message.
    pub fn notice_then_menu(notice: Notice) -> Self {
        Self::replace(vec![Render::Notice(notice), Render::MainMenu])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    Welcome,
    MainMenu,
    RoutesMenu,
    Card(Card),
    Review(ReviewPage),
    Prompt(Prompt),
    Notice(Notice),
}

/// Which list a card belongs to; decides its buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    MyRoute,
    Search,
    Application,
    History,
}

impl CardKind {
    pub fn for_context(ctx: ListContext) -> Option<Self> {
        match ctx {
            ListContext::Routes => Some(Self::MyRoute),
            ListContext::Search => Some(Self::Search),
            ListContext::Applications => Some(Self::Application),
            ListContext::History => Some(Self::History),
            ListContext::Reviews => None,
        }
    }

    pub fn context(self) -> ListContext {
        match self {
            Self::MyRoute => ListContext::Routes,
            Self::Search => ListContext::Search,
            Self::Application => ListContext::Applications,
            Self::History => ListContext::History,
        }
    }
}

/// One route shown as a photo with caption and buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub kind: CardKind,
    pub index: usize,
    pub total: usize,
    pub route: Route,
    /// The viewer's own review; set on history cards only
    pub viewer_review: Option<String>,
}

/// One review of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPage {
    pub route_title: String,
    pub index: usize,
    pub total: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Photo,
    Title,
    Description,
    Price,
    Location,
    Review,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NotFound,
    Empty(ListContext),
    TravelAdded,
    ApplicationConfirmed,
    ApplicationRejected,
    AlreadyReviewed,
    ReviewSaved,
    UnknownCommand(String),
    UnknownMessage,
    RetryLater,
}
