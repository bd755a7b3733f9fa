//! Plan file locations and persistence.
//!
//! # Responsibility
//! - Resolve the working directory and plan file paths.
//! - Read and write schedules as UTF-8 JSON files.
//!
//! # Invariants
//! - Writes are all-or-nothing: the full JSON text is produced first, then
//!   written to a sibling temp file that is renamed over the destination.
//! - A failed read never yields a partial schedule.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod plan_file;

pub use plan_file::{
    read_schedule, write_schedule, write_text_atomic, PlanFiles, DEFAULT_PLAN_FILE,
    EXAMPLE_PLAN_FILE, PLAN_FILE_EXTENSION, WORKDIR_NAME,
};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    /// Reading, writing or creating a path failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File content is not a valid schedule document.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Schedule could not be encoded before writing.
    Encode(serde_json::Error),
    /// User-supplied plan name is not a plain file name.
    InvalidFileName(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "`{}`: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "`{}` is not a valid plans file: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode plans: {err}"),
            Self::InvalidFileName(name) => write!(f, "invalid plans file name `{name}`"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::InvalidFileName(_) => None,
        }
    }
}
