//! Button tags and the typed commands they carry.
//!
//! Tags are short colon-separated strings (`travel:3`, `nav:search:next`)
//! that fit in Telegram's 64-byte callback data. They are decoded once, at
//! the boundary; everything past [`Command::parse`] works with the enum.

use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::cursor::Direction;

/// A pageable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ListContext {
    /// The user's own routes
    Routes,
    /// The global catalog
    Search,
    Applications,
    History,
    /// Reviews of the route in `Session::review_target`
    Reviews,
}

/// Card whose reviews are being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewTarget {
    Search(usize),
    History(usize),
}

impl ReviewTarget {
    pub fn context(&self) -> ListContext {
        match self {
            Self::Search(_) => ListContext::Search,
            Self::History(_) => ListContext::History,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Search(i) | Self::History(i) => *i,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    MainMenu,
    RoutesMenu,
    Search,
    Applications,
    History,
    CreateRoute,
    MyRoutes,
    Navigate(ListContext, Direction),
    /// Request the search result at this index
    Travel(usize),
    Confirm(usize),
    Reject(usize),
    /// Review the history entry at this index
    WriteReview(usize),
    ShowReviews(ReviewTarget),
    BackToRoute,
    Unknown(String),
}

impl Command {
    /// Decodes a button tag. Never fails: anything unrecognised becomes
    /// [`Command::Unknown`] carrying the raw tag.
    pub fn parse(tag: &str) -> Self {
        decode(tag).unwrap_or_else(|| Self::Unknown(tag.to_string()))
    }

    /// Encodes the command as a button tag.
    pub fn tag(&self) -> String {
        match self {
            Self::MainMenu => "menu:main".to_string(),
            Self::RoutesMenu => "menu:routes".to_string(),
            Self::Search => "menu:search".to_string(),
            Self::Applications => "menu:applications".to_string(),
            Self::History => "menu:history".to_string(),
            Self::CreateRoute => "routes:create".to_string(),
            Self::MyRoutes => "routes:mine".to_string(),
            Self::Navigate(ctx, dir) => format!("nav:{}:{}", ctx, dir),
            Self::Travel(i) => format!("travel:{}", i),
            Self::Confirm(i) => format!("app:confirm:{}", i),
            Self::Reject(i) => format!("app:reject:{}", i),
            Self::WriteReview(i) => format!("review:write:{}", i),
            Self::ShowReviews(ReviewTarget::Search(i)) => format!("reviews:search:{}", i),
            Self::ShowReviews(ReviewTarget::History(i)) => format!("reviews:history:{}", i),
            Self::BackToRoute => "reviews:back".to_string(),
            Self::Unknown(tag) => tag.clone(),
        }
    }
}

fn decode(tag: &str) -> Option<Command> {
    let parts: Vec<&str> = tag.split(':').collect();
    let command = match parts.as_slice() {
        ["menu", "main"] => Command::MainMenu,
        ["menu", "routes"] => Command::RoutesMenu,
        ["menu", "search"] => Command::Search,
        ["menu", "applications"] => Command::Applications,
        ["menu", "history"] => Command::History,
        ["routes", "create"] => Command::CreateRoute,
        ["routes", "mine"] => Command::MyRoutes,
        ["nav", ctx, dir] => Command::Navigate(ctx.parse().ok()?, dir.parse().ok()?),
        ["travel", i] => Command::Travel(index(i)?),
        ["app", "confirm", i] => Command::Confirm(index(i)?),
        ["app", "reject", i] => Command::Reject(index(i)?),
        ["review", "write", i] => Command::WriteReview(index(i)?),
        ["reviews", "search", i] => Command::ShowReviews(ReviewTarget::Search(index(i)?)),
        ["reviews", "history", i] => Command::ShowReviews(ReviewTarget::History(index(i)?)),
        ["reviews", "back"] => Command::BackToRoute,
        _ => return None,
    };
    Some(command)
}

/// Plain decimal only; rejects signs and whitespace.
fn index(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
