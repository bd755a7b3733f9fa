//! In-memory event store for the weekly schedule.
//!
//! # Responsibility
//! - Own the schedule and enforce add/edit/delete invariants.
//! - Provide chronological per-day retrieval and JSON (de)serialization.
//!
//! # Invariants
//! - Every mutation either fully applies or leaves the schedule unchanged.
//! - Store APIs return typed errors instead of coercing invalid input.

pub mod event_store;
pub mod schedule;
