//! Domain types for the show library with strong typing.
//!
//! Season and episode numbers, and the database identifiers of shows and
//! episodes, are wrapped in newtypes so they cannot be mixed up with each other
//! or with plain integers.

pub mod events;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a persisted show.
///
/// # Examples
///
/// ```rust
/// use showarr::domain::ShowId;
///
/// let id = ShowId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ShowId(i32);

impl ShowId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "ShowId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ShowId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// Unique identifier of a persisted episode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EpisodeId(i32);

impl EpisodeId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl From<i32> for EpisodeId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// Season number with two sentinel values.
///
/// [`SeasonNumber::NO_SEASON`] means the season could not be determined at all
/// (there was no file to look at), while [`SeasonNumber::SPECIALS`] is the
/// conventional season 0 that files land in when no naming pattern matched.
///
/// # Examples
///
/// ```rust
/// use showarr::domain::SeasonNumber;
///
/// assert_eq!(SeasonNumber::new(3).to_string(), "Season 3");
/// assert_eq!(SeasonNumber::SPECIALS.to_string(), "Specials");
/// assert!(SeasonNumber::NO_SEASON.is_unknown());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonNumber(i32);

impl SeasonNumber {
    pub const NO_SEASON: Self = Self(-1);
    pub const SPECIALS: Self = Self(0);

    #[must_use]
    pub const fn new(season: i32) -> Self {
        Self(season)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub const fn is_specials(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SeasonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "Unknown")
        } else if self.is_specials() {
            write!(f, "Specials")
        } else {
            write!(f, "Season {}", self.0)
        }
    }
}

impl From<i32> for SeasonNumber {
    fn from(season: i32) -> Self {
        Self::new(season)
    }
}

/// Episode number within a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeNumber(u32);

impl EpisodeNumber {
    #[must_use]
    pub const fn new(episode: u32) -> Self {
        Self(episode)
    }

    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EpisodeNumber {
    fn from(episode: u32) -> Self {
        Self::new(episode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_id_conversions() {
        let id = ShowId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(ShowId::from(42), id);
    }

    #[test]
    fn season_sentinels() {
        assert!(SeasonNumber::NO_SEASON.is_unknown());
        assert!(!SeasonNumber::NO_SEASON.is_specials());
        assert!(SeasonNumber::SPECIALS.is_specials());
        assert_eq!(SeasonNumber::new(0), SeasonNumber::SPECIALS);
        assert!(SeasonNumber::NO_SEASON < SeasonNumber::SPECIALS);
    }

    #[test]
    fn season_display() {
        assert_eq!(SeasonNumber::new(12).to_string(), "Season 12");
        assert_eq!(SeasonNumber::SPECIALS.to_string(), "Specials");
        assert_eq!(SeasonNumber::NO_SEASON.to_string(), "Unknown");
    }

    #[test]
    fn episode_number_serialization() {
        let ep = EpisodeNumber::new(7);
        let json = serde_json::to_string(&ep).unwrap();
        assert_eq!(json, "7");
        let back: EpisodeNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ep);
    }
}
