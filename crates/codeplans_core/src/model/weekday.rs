//! Closed weekday set used to bucket events.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One of the seven fixed schedule days.
///
/// Declaration order is the display order of the weekly overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays, monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Canonical lowercase name, also used as the persisted day key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        validate_day(value)
    }
}

/// Parses a user-entered day name.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Errors
/// - Returns `ValidationError::InvalidDay` for anything outside the weekday set.
pub fn validate_day(value: &str) -> Result<Weekday, ValidationError> {
    let normalized = value.trim().to_ascii_lowercase();
    Weekday::ALL
        .into_iter()
        .find(|day| day.as_str() == normalized)
        .ok_or_else(|| ValidationError::InvalidDay(value.to_string()))
}
