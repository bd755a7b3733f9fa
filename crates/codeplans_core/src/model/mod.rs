//! Weekly schedule domain model.
//!
//! # Responsibility
//! - Define the closed weekday set and the event record stored per day.
//! - Provide pure validation for user-entered days, times and titles.
//!
//! # Invariants
//! - Only the seven lowercase weekday names are accepted as input.
//! - Times accepted from input are always strict `HH:MM` (24h).

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod event;
pub mod weekday;

/// Validation failure for user-provided schedule values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Input is not one of the seven weekday names.
    InvalidDay(String),
    /// Input is not a strict `HH:MM` 24h time.
    InvalidTime(String),
    /// Event title is empty or whitespace only.
    EmptyTitle,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDay(value) => write!(f, "{value} is not a day"),
            Self::InvalidTime(value) => write!(f, "{value} is not a time"),
            Self::EmptyTitle => write!(f, "event title cannot be empty"),
        }
    }
}

impl Error for ValidationError {}
