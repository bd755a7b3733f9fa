//! Event record and time-of-day validation.
//!
//! # Responsibility
//! - Define the per-day event record and its short opaque identifier.
//! - Validate and order `HH:MM` time strings.
//!
//! # Invariants
//! - Generated ids are exactly `EVENT_ID_LEN` chars from `EVENT_ID_ALPHABET`.
//! - Time fields are plain strings so loaded files keep exactly what was stored.

use super::ValidationError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Length of generated event ids.
pub const EVENT_ID_LEN: usize = 6;
/// Characters used for generated event ids.
pub const EVENT_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const TIME_FORMAT: &str = "%H:%M";

/// Opaque identifier naming an event within its day bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Wraps an id exactly as given.
    ///
    /// Used by id generators and by deserialization, which keeps stored keys verbatim.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Normalizes an id typed by a user.
    ///
    /// Surrounding whitespace and `[`/`]` brackets (as printed in listings) are
    /// removed and letters are upper-cased. Returns `None` for empty input.
    pub fn from_user_input(value: &str) -> Option<Self> {
        let normalized = value
            .trim()
            .replace(['[', ']'], "")
            .trim()
            .to_ascii_uppercase();
        if normalized.is_empty() {
            return None;
        }
        Some(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A titled time interval stored under one weekday.
///
/// `end_time` is not required to be after `start_time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    /// `HH:MM`, 24h.
    pub start_time: String,
    /// `HH:MM`, 24h.
    pub end_time: String,
    pub title: String,
}

impl Event {
    pub fn new(
        id: EventId,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            start_time: start_time.into(),
            end_time: end_time.into(),
            title: title.into(),
        }
    }

    /// Start time as minutes after midnight, `None` when the stored value is malformed.
    pub fn start_minutes(&self) -> Option<u32> {
        minutes_of_day(&self.start_time)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} {}", self.start_time, self.end_time, self.title)
    }
}

/// Validates a strict `HH:MM` 24h time string.
///
/// Hours must be `00..=23` and minutes `00..=59`, both zero-padded.
///
/// # Errors
/// - Returns `ValidationError::InvalidTime` for `9:5`, `25:00`, `abc` and the like.
pub fn validate_time(value: &str) -> Result<NaiveTime, ValidationError> {
    parse_time(value).ok_or_else(|| ValidationError::InvalidTime(value.to_string()))
}

/// Returns minutes after midnight for a strict `HH:MM` string.
pub fn minutes_of_day(value: &str) -> Option<u32> {
    parse_time(value).map(|time| time.hour() * 60 + time.minute())
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    // chrono accepts single-digit fields, so pin the shape first.
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(idx, byte)| idx == 2 || byte.is_ascii_digit());
    if !well_formed {
        return None;
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT).ok()
}

/// Validates a title for a new or edited event.
///
/// # Errors
/// - Returns `ValidationError::EmptyTitle` for empty or whitespace-only input.
pub fn validate_title(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}
