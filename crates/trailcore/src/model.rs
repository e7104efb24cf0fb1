//! Route records as they are stored in the JSON collections.
//!
//! The same [`Route`] shape is used for the global catalog, a user's own
//! routes, pending applications and trip history: applications and history
//! entries are value copies of the catalog record taken at request time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Telegram user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a route across all of its copies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub Uuid);

impl RouteId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identity for records written before routes carried an id.
    ///
    /// Derived from the image reference, so every copy of the same legacy
    /// route resolves to the same id.
    pub fn from_photo(photo: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, photo.as_bytes()))
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A travel offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default, skip_serializing_if = "RouteId::is_nil")]
    pub id: RouteId,
    /// Creator of the route; absent on legacy records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
    /// Telegram file id of the route photo
    pub photo: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub location: String,
    /// Review text keyed by the author's user id
    #[serde(default)]
    pub reviews: BTreeMap<String, String>,
}

impl Route {
    /// Fills in the id of a legacy record.
    pub fn ensure_id(&mut self) {
        if self.id.is_nil() {
            self.id = RouteId::from_photo(&self.photo);
        }
    }

    pub fn review_of(&self, user: UserId) -> Option<&str> {
        self.reviews.get(&user.to_string()).map(String::as_str)
    }

    pub fn has_review_from(&self, user: UserId) -> bool {
        self.reviews.contains_key(&user.to_string())
    }

    pub fn set_review(&mut self, user: UserId, text: impl Into<String>) {
        self.reviews.insert(user.to_string(), text.into());
    }

    /// Review bodies in display order (ascending author id).
    pub fn review_texts(&self) -> Vec<&str> {
        self.reviews.values().map(String::as_str).collect()
    }

    /// Copies every review of `other` into this record, keeping reviews that
    /// only exist here. Returns `true` when anything changed.
    pub fn merge_reviews(&mut self, other: &Route) -> bool {
        let mut changed = false;
        for (author, text) in &other.reviews {
            if self.reviews.get(author) != Some(text) {
                self.reviews.insert(author.clone(), text.clone());
                changed = true;
            }
        }
        changed
    }
}

/// Fields collected by the creation wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDraft {
    pub photo: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub location: Option<String>,
}

impl RouteDraft {
    /// Builds the route once every field is present.
    pub fn into_route(self, owner: UserId) -> Option<Route> {
        Some(Route {
            id: RouteId::generate(),
            owner: Some(owner),
            photo: self.photo?,
            title: self.title?,
            description: self.description?,
            price: self.price?,
            location: self.location?,
            reviews: BTreeMap::new(),
        })
    }
}
