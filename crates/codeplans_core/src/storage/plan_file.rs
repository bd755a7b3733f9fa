//! Plan file path resolution and JSON file IO.

use super::{StorageError, StorageResult};
use crate::store::schedule::Schedule;
use log::{error, info};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Working directory name created under the current directory.
pub const WORKDIR_NAME: &str = "CodePlans";
/// Plan file used when the user does not name one.
pub const DEFAULT_PLAN_FILE: &str = "MainPlans.json";
/// Destination of the downloaded example plan.
pub const EXAMPLE_PLAN_FILE: &str = "ExamplePlan.json";
pub const PLAN_FILE_EXTENSION: &str = "json";

/// Plan file locations under one working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanFiles {
    workdir: PathBuf,
}

impl PlanFiles {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Uses `<cwd>/CodePlans`.
    pub fn in_current_dir() -> StorageResult<Self> {
        let cwd = std::env::current_dir().map_err(|source| StorageError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Ok(Self::new(cwd.join(WORKDIR_NAME)))
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn default_path(&self) -> PathBuf {
        self.workdir.join(DEFAULT_PLAN_FILE)
    }

    pub fn example_path(&self) -> PathBuf {
        self.workdir.join(EXAMPLE_PLAN_FILE)
    }

    /// Resolves a plan name typed without extension.
    ///
    /// Empty input selects the default file.
    ///
    /// # Errors
    /// - `InvalidFileName` when the name contains path separators or is `.`/`..`.
    pub fn named_path(&self, name: &str) -> StorageResult<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(self.default_path());
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) || name.contains('\0') {
            return Err(StorageError::InvalidFileName(name.to_string()));
        }
        Ok(self.workdir.join(format!("{name}.{PLAN_FILE_EXTENSION}")))
    }
}

/// Reads and decodes a plan file.
///
/// # Errors
/// - `Io` when the file is missing or unreadable.
/// - `Parse` when the content is not a schedule object.
pub fn read_schedule(path: &Path) -> StorageResult<Schedule> {
    let started_at = Instant::now();
    let text = fs::read_to_string(path).map_err(|source| {
        error!(
            "event=plans_read module=storage status=error duration_ms={} error_code=io path={} error={}",
            started_at.elapsed().as_millis(),
            path.display(),
            source
        );
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let schedule = Schedule::from_json(&text).map_err(|source| {
        error!(
            "event=plans_read module=storage status=error duration_ms={} error_code=parse path={} error={}",
            started_at.elapsed().as_millis(),
            path.display(),
            source
        );
        StorageError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(
        "event=plans_read module=storage status=ok duration_ms={} path={} events={}",
        started_at.elapsed().as_millis(),
        path.display(),
        schedule.event_count()
    );
    Ok(schedule)
}

/// Encodes and writes a schedule, creating the parent directory if needed.
pub fn write_schedule(path: &Path, schedule: &Schedule) -> StorageResult<()> {
    let text = schedule.to_json().map_err(StorageError::Encode)?;
    write_text_atomic(path, &text)
}

/// Writes `text` to `path` through a temp file and rename.
///
/// The destination is either fully replaced or left untouched.
pub fn write_text_atomic(path: &Path, text: &str) -> StorageResult<()> {
    let started_at = Instant::now();
    let io_error = |target: &Path, source: std::io::Error| {
        error!(
            "event=plans_write module=storage status=error duration_ms={} path={} error={}",
            started_at.elapsed().as_millis(),
            target.display(),
            source
        );
        StorageError::Io {
            path: target.to_path_buf(),
            source,
        }
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }

    let temp_path = path.with_extension(format!("{PLAN_FILE_EXTENSION}.tmp"));
    replace_through_temp(path, &temp_path, |file| file.write_all(text.as_bytes()))
        .map_err(|(target, source)| io_error(&target, source))?;

    info!(
        "event=plans_write module=storage status=ok duration_ms={} path={} bytes={}",
        started_at.elapsed().as_millis(),
        path.display(),
        text.len()
    );
    Ok(())
}

/// Fills `temp_path` and renames it over `path`.
///
/// The temp file is removed on every failure. The error carries the path that failed.
fn replace_through_temp(
    path: &Path,
    temp_path: &Path,
    fill: impl FnOnce(&mut File) -> io::Result<()>,
) -> Result<(), (PathBuf, io::Error)> {
    let result = File::create(temp_path)
        .and_then(|mut file| {
            fill(&mut file)?;
            file.sync_all()
        })
        .map_err(|source| (temp_path.to_path_buf(), source))
        .and_then(|()| {
            fs::rename(temp_path, path).map_err(|source| (path.to_path_buf(), source))
        });
    if result.is_err() {
        let _ = fs::remove_file(temp_path);
    }
    result
}
