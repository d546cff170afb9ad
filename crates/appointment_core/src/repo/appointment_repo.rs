//! Appointment repository contract and JSON file implementation.
//!
//! # Responsibility
//! - Read and write the full appointment list as one unit.
//! - Keep file format and I/O details inside the persistence boundary.
//!
//! # Invariants
//! - Writes always replace the whole file; there are no partial appends.
//! - A write lands through a sibling temp file and a rename, so a failed
//!   write leaves the previous file intact.
//! - Reads reject malformed content instead of masking it; the store decides
//!   how to degrade.
//! - Setting aside an unreadable file never overwrites an earlier copy.

use crate::model::appointment::{Appointment, AppointmentId};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for backing file reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Io { path: PathBuf, source: io::Error },
    Json(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json(err) => write!(f, "malformed appointments file: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted appointments: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Whole-list persistence for appointments.
pub trait AppointmentRepository {
    /// Returns every persisted appointment in stored order.
    fn load_all(&self) -> RepoResult<Vec<Appointment>>;
    /// Replaces the persisted list with `appointments`.
    fn save_all(&self, appointments: &[Appointment]) -> RepoResult<()>;
    /// Moves unreadable persisted data out of the way of the next save.
    fn preserve_unreadable(&self) -> RepoResult<()> {
        Ok(())
    }
}

/// Repository backed by a single pretty-printed JSON array file.
#[derive(Debug, Clone)]
pub struct JsonFileAppointmentRepository {
    path: PathBuf,
}

impl JsonFileAppointmentRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling_path(".tmp")
    }

    /// First `<file>.corrupt`, `<file>.corrupt.1`, ... that does not exist yet.
    fn corrupt_copy_path(&self) -> PathBuf {
        let first = self.sibling_path(".corrupt");
        if !first.exists() {
            return first;
        }
        (1..)
            .map(|n| self.sibling_path(&format!(".corrupt.{n}")))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl AppointmentRepository for JsonFileAppointmentRepository {
    fn load_all(&self) -> RepoResult<Vec<Appointment>> {
        let started_at = Instant::now();

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=file_load module=repo status=missing count=0");
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=file_load module=repo status=error error_code=read_failed error={}",
                    err
                );
                return Err(self.io_error(err));
            }
        };

        if content.trim().is_empty() {
            info!("event=file_load module=repo status=empty count=0");
            return Ok(Vec::new());
        }

        let appointments: Vec<Appointment> = serde_json::from_str(&content).map_err(|err| {
            error!(
                "event=file_load module=repo status=error error_code=parse_failed error={}",
                err
            );
            RepoError::from(err)
        })?;
        ensure_unique_ids(&appointments)?;

        info!(
            "event=file_load module=repo status=ok count={} duration_ms={}",
            appointments.len(),
            started_at.elapsed().as_millis()
        );
        Ok(appointments)
    }

    fn save_all(&self, appointments: &[Appointment]) -> RepoResult<()> {
        let started_at = Instant::now();
        let payload = serde_json::to_vec_pretty(appointments)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }

        let temp_path = self.temp_path();
        let written =
            fs::write(&temp_path, payload).and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path);
            error!(
                "event=file_save module=repo status=error error_code=write_failed error={}",
                err
            );
            return Err(self.io_error(err));
        }

        info!(
            "event=file_save module=repo status=ok count={} duration_ms={}",
            appointments.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn preserve_unreadable(&self) -> RepoResult<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let target = self.corrupt_copy_path();
        fs::rename(&self.path, &target).map_err(|err| {
            error!(
                "event=file_preserve module=repo status=error error_code=rename_failed error={}",
                err
            );
            self.io_error(err)
        })?;
        warn!(
            "event=file_preserve module=repo status=ok target={}",
            target.display()
        );
        Ok(())
    }
}

fn ensure_unique_ids(appointments: &[Appointment]) -> RepoResult<()> {
    let mut seen: HashSet<AppointmentId> = HashSet::with_capacity(appointments.len());
    for appointment in appointments {
        if !seen.insert(appointment.id) {
            return Err(RepoError::InvalidData(format!(
                "duplicate appointment id {}",
                appointment.id
            )));
        }
    }
    Ok(())
}
