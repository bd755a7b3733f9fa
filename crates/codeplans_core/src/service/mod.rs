//! Core use-case services.
//!
//! # Responsibility
//! - Combine the event store with plan file persistence and the example download.
//! - Keep shell code decoupled from storage details.

pub mod planner;
