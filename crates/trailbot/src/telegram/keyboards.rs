//! Inline keyboards for menus, route cards and the review pager.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use trailcore::navigation::{Card, CardKind, Direction, ListContext, ReviewTarget};
use trailcore::Command as Action;
use unic_langid::LanguageIdentifier;

use super::cb;
use crate::i18n::t;

pub fn main_menu(lang: &LanguageIdentifier) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![cb(t(lang, "btn-routes"), &Action::RoutesMenu)],
        vec![cb(t(lang, "btn-search"), &Action::Search)],
        vec![cb(t(lang, "btn-applications"), &Action::Applications)],
        vec![cb(t(lang, "btn-history"), &Action::History)],
    ])
}

pub fn routes_menu(lang: &LanguageIdentifier) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![cb(t(lang, "btn-create"), &Action::CreateRoute)],
        vec![cb(t(lang, "btn-mine"), &Action::MyRoutes)],
        vec![cb(t(lang, "btn-back"), &Action::MainMenu)],
    ])
}

/// Buttons under a route card; depend on the list and the route's reviews.
pub fn card(lang: &LanguageIdentifier, card: &Card) -> InlineKeyboardMarkup {
    let index = card.index;
    let has_reviews = !card.route.reviews.is_empty();
    let mut rows = vec![nav_row(lang, card.kind.context())];

    match card.kind {
        CardKind::MyRoute => {}
        CardKind::Search => {
            if has_reviews {
                rows.push(vec![cb(
                    t(lang, "btn-reviews"),
                    &Action::ShowReviews(ReviewTarget::Search(index)),
                )]);
            }
            rows.push(vec![cb(t(lang, "btn-travel"), &Action::Travel(index))]);
        }
        CardKind::Application => {
            rows.push(vec![
                cb(t(lang, "btn-confirm"), &Action::Confirm(index)),
                cb(t(lang, "btn-reject"), &Action::Reject(index)),
            ]);
        }
        CardKind::History => {
            if has_reviews {
                rows.push(vec![cb(
                    t(lang, "btn-reviews"),
                    &Action::ShowReviews(ReviewTarget::History(index)),
                )]);
            }
            rows.push(vec![cb(t(lang, "btn-write-review"), &Action::WriteReview(index))]);
        }
    }

    rows.push(vec![cb(t(lang, "btn-menu"), &Action::MainMenu)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn review_page(lang: &LanguageIdentifier) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        nav_row(lang, ListContext::Reviews),
        vec![cb(t(lang, "btn-back-to-route"), &Action::BackToRoute)],
    ])
}

fn nav_row(lang: &LanguageIdentifier, ctx: ListContext) -> Vec<InlineKeyboardButton> {
    vec![
        cb(t(lang, "btn-prev"), &Action::Navigate(ctx, Direction::Prev)),
        cb(t(lang, "btn-next"), &Action::Navigate(ctx, Direction::Next)),
    ]
}
