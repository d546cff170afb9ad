//! Tagged presentation commands.
//!
//! Each user action maps to exactly one variant, so add and delete never
//! share a handler.

use crate::model::appointment::{Appointment, AppointmentId};
use crate::model::draft::AppointmentDraft;

/// A user action against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentCommand {
    /// Parse the raw fields and add the result.
    Add(AppointmentDraft),
    /// Delete by stable id.
    Delete(AppointmentId),
    /// Delete by current list position, for list widgets that only know the
    /// selected row.
    DeleteAt(usize),
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// `conflicts` is empty when the new appointment overlaps nothing.
    Added {
        appointment: Appointment,
        conflicts: Vec<Appointment>,
    },
    Deleted {
        appointment: Appointment,
    },
}

impl CommandOutcome {
    /// The appointment added or removed by the command.
    pub fn appointment(&self) -> &Appointment {
        match self {
            Self::Added { appointment, .. } | Self::Deleted { appointment } => appointment,
        }
    }

    /// Overlap warnings to show the user; always empty for deletes.
    pub fn conflicts(&self) -> &[Appointment] {
        match self {
            Self::Added { conflicts, .. } => conflicts,
            Self::Deleted { .. } => &[],
        }
    }
}
