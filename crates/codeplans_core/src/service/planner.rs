//! Planner session service.
//!
//! # Responsibility
//! - Own the event store and the currently selected plan file.
//! - Provide load/save/download use-cases with logging.
//!
//! # Invariants
//! - A failed load or download leaves the in-memory schedule untouched.
//! - A failed save leaves both the schedule and the destination file untouched.
//! - Empty schedules are never saved.

use crate::remote::{fetch_text, RemoteError};
use crate::storage::{read_schedule, write_schedule, write_text_atomic, PlanFiles, StorageError};
use crate::store::event_store::{EventStore, IdSource, RandomIdSource, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Debug)]
pub enum PlannerError {
    Store(StoreError),
    Storage(StorageError),
    Remote(RemoteError),
    /// Save was requested for a schedule without events.
    NothingToSave,
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "{err}"),
            Self::NothingToSave => write!(f, "there are no plans to save"),
        }
    }
}

impl Error for PlannerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Remote(err) => Some(err),
            Self::NothingToSave => None,
        }
    }
}

impl From<StoreError> for PlannerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<StorageError> for PlannerError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<RemoteError> for PlannerError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

/// One interactive planning session over a working directory.
pub struct PlannerService<I = RandomIdSource> {
    store: EventStore<I>,
    files: PlanFiles,
    active_path: PathBuf,
}

impl PlannerService<RandomIdSource> {
    /// Starts with an empty schedule and the default plan file selected.
    pub fn new(files: PlanFiles) -> Self {
        Self::with_store(EventStore::new(), files)
    }
}

impl<I: IdSource> PlannerService<I> {
    pub fn with_store(store: EventStore<I>, files: PlanFiles) -> Self {
        let active_path = files.default_path();
        Self {
            store,
            files,
            active_path,
        }
    }

    pub fn store(&self) -> &EventStore<I> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EventStore<I> {
        &mut self.store
    }

    pub fn files(&self) -> &PlanFiles {
        &self.files
    }

    /// Plan file used by the next `load`/`save`.
    pub fn active_path(&self) -> &Path {
        &self.active_path
    }

    /// Returns whether the default plan file exists on disk.
    pub fn has_saved_plans(&self) -> bool {
        self.files.default_path().is_file()
    }

    /// Selects the plan file by name; empty selects the default file.
    pub fn select_file(&mut self, name: &str) -> PlannerResult<&Path> {
        self.active_path = self.files.named_path(name)?;
        Ok(self.active_path.as_path())
    }

    /// Replaces the schedule with the content of the active plan file.
    ///
    /// Returns the number of loaded events.
    pub fn load(&mut self) -> PlannerResult<usize> {
        let path = self.active_path.clone();
        self.load_from(&path)
    }

    fn load_from(&mut self, path: &Path) -> PlannerResult<usize> {
        match read_schedule(path) {
            Ok(schedule) => {
                let count = schedule.event_count();
                self.store.replace_schedule(schedule);
                info!(
                    "event=plans_load module=service status=ok path={} events={}",
                    path.display(),
                    count
                );
                Ok(count)
            }
            Err(err) => {
                warn!(
                    "event=plans_load module=service status=error path={} schedule=unchanged",
                    path.display()
                );
                Err(err.into())
            }
        }
    }

    /// Writes the schedule to the active plan file and returns its path.
    pub fn save(&self) -> PlannerResult<&Path> {
        if self.store.is_empty() {
            return Err(PlannerError::NothingToSave);
        }
        write_schedule(&self.active_path, self.store.schedule())?;
        info!(
            "event=plans_save module=service status=ok path={} events={}",
            self.active_path.display(),
            self.store.schedule().event_count()
        );
        Ok(self.active_path.as_path())
    }

    /// Downloads the example plan, stores it verbatim and loads it.
    ///
    /// The example file becomes the active plan file once it loads.
    pub fn download_example(&mut self, url: &str) -> PlannerResult<usize> {
        let text = fetch_text(url)?;
        self.install_example(&text)
    }

    /// Writes already-fetched example text and loads it.
    pub fn install_example(&mut self, text: &str) -> PlannerResult<usize> {
        let example_path = self.files.example_path();
        write_text_atomic(&example_path, text)?;
        let count = self.load_from(&example_path)?;
        self.active_path = example_path;
        Ok(count)
    }
}
