//! Route collections persisted as JSON documents

pub mod json_store;

use crate::model::UserId;
use strum::{AsRefStr, Display, EnumIter};

pub use json_store::JsonStore;

/// Owner of a collection file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    User(UserId),
}

/// Kind of records held by a collection file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
    Routes,
    Applications,
    History,
}
