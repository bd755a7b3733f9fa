//! Core domain logic for CodePlans, a personal weekly schedule.
//! This crate is the single source of truth for schedule invariants.

pub mod logging;
pub mod model;
pub mod remote;
pub mod service;
pub mod storage;
pub mod store;

pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::event::{validate_time, validate_title, Event, EventId};
pub use model::weekday::{validate_day, Weekday};
pub use model::ValidationError;
pub use remote::{fetch_text, RemoteError, EXAMPLE_PLAN_URL};
pub use service::planner::{PlannerError, PlannerResult, PlannerService};
pub use storage::{PlanFiles, StorageError, StorageResult};
pub use store::event_store::{
    EventEdit, EventStore, IdSource, RandomIdSource, StoreError, StoreResult,
};
pub use store::schedule::Schedule;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
