//! Wrapping pagination over a list of known length.

use strum::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Prev,
    Next,
}

/// Moves `current` one place in `direction`, wrapping at both ends.
///
/// Returns `None` for an empty list. A stale `current` beyond the end is
/// wrapped into range first.
pub fn step(current: usize, direction: Direction, len: usize) -> Option<usize> {
    let current = clamp(current, len)?;
    let next = match direction {
        Direction::Next if current + 1 == len => 0,
        Direction::Next => current + 1,
        Direction::Prev if current == 0 => len - 1,
        Direction::Prev => current - 1,
    };
    Some(next)
}

/// Wraps a stored index into `[0, len)`; `None` for an empty list.
pub fn clamp(current: usize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(current % len)
    }
}
