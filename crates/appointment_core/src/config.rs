//! Store configuration.
//!
//! # Responsibility
//! - Name the backing file and the overlap policy a store runs with.
//!
//! # Invariants
//! - The default backing file is resolved against the working directory.
//! - The default policy warns on overlaps and never blocks.

use std::path::{Path, PathBuf};

/// Backing file name used when no explicit path is configured.
pub const DEFAULT_FILE_NAME: &str = "appointments.json";

/// What the command path does when a new appointment overlaps existing ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Add anyway and report the conflicts.
    #[default]
    Warn,
    /// Reject the add and report the conflicts.
    Block,
}

/// Settings for constructing an appointment store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub file_path: PathBuf,
    pub overlap_policy: OverlapPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(DEFAULT_FILE_NAME),
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Config whose backing file is `DEFAULT_FILE_NAME` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::default().with_file(dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    pub fn with_file(mut self, file_path: impl Into<PathBuf>) -> Self {
        self.file_path = file_path.into();
        self
    }

    pub fn with_policy(mut self, overlap_policy: OverlapPolicy) -> Self {
        self.overlap_policy = overlap_policy;
        self
    }
}
