//! Appointment store service.
//!
//! # Responsibility
//! - Own the in-memory appointment list for one backing file.
//! - Run every mutation as validate -> mutate -> sort -> persist.
//! - Route tagged presentation commands to distinct handlers.
//!
//! # Invariants
//! - The list is always sorted ascending by `start`; ties keep insertion order.
//! - After a successful mutation the backing file holds the full list.
//! - A failed persist rolls the in-memory list back to its previous state.
//! - Load failures degrade to an empty list and are kept for display, never
//!   raised.
//! - After a failed load, the unreadable backing file is set aside before
//!   the first write replaces it.

use crate::config::{OverlapPolicy, StoreConfig};
use crate::conflict::overlap::check_against_all;
use crate::model::appointment::{Appointment, AppointmentId, AppointmentValidationError};
use crate::repo::appointment_repo::{
    AppointmentRepository, JsonFileAppointmentRepository, RepoError,
};
use crate::service::command::{AppointmentCommand, CommandOutcome};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced to the presentation layer by store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Candidate failed model validation.
    Validation(AppointmentValidationError),
    /// An appointment with this id is already stored.
    DuplicateId(AppointmentId),
    /// Delete target id is not stored.
    NotFound(AppointmentId),
    /// Delete target position is past the end of the list.
    IndexOutOfRange { index: usize, len: usize },
    /// Writing the backing file failed; the list was rolled back.
    Persistence(RepoError),
    /// Overlap policy is `Block` and the candidate collides with these.
    Overlap(Vec<Appointment>),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "appointment already exists: {id}"),
            Self::NotFound(id) => write!(f, "appointment not found: {id}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "no appointment at position {index} (list has {len})")
            }
            Self::Persistence(err) => write!(f, "failed to save appointments: {err}"),
            Self::Overlap(conflicts) => write!(
                f,
                "appointment overlaps {} existing appointment(s)",
                conflicts.len()
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AppointmentValidationError> for StoreError {
    fn from(value: AppointmentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Sorted appointment list bound to one repository.
pub struct AppointmentStore<R: AppointmentRepository> {
    repo: R,
    appointments: Vec<Appointment>,
    overlap_policy: OverlapPolicy,
    load_issue: Option<String>,
    preserve_pending: bool,
}

impl AppointmentStore<JsonFileAppointmentRepository> {
    /// Opens the JSON file store described by `config`.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::open(JsonFileAppointmentRepository::new(config.file_path.clone()))
            .with_policy(config.overlap_policy)
    }
}

impl<R: AppointmentRepository> AppointmentStore<R> {
    /// Creates a store and loads its current contents from `repo`.
    pub fn open(repo: R) -> Self {
        let mut store = Self {
            repo,
            appointments: Vec::new(),
            overlap_policy: OverlapPolicy::default(),
            load_issue: None,
            preserve_pending: false,
        };
        store.load_all();
        store
    }

    pub fn with_policy(mut self, overlap_policy: OverlapPolicy) -> Self {
        self.overlap_policy = overlap_policy;
        self
    }

    /// Current appointments, sorted by start.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn get(&self, id: AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|entry| entry.id == id)
    }

    /// Reason the last load fell back to an empty list, if it did.
    pub fn load_issue(&self) -> Option<&str> {
        self.load_issue.as_deref()
    }

    /// Replaces the in-memory list with the repository contents.
    ///
    /// Unreadable or malformed data yields an empty list; the reason is kept
    /// in `load_issue()`.
    pub fn load_all(&mut self) -> &[Appointment] {
        match self.repo.load_all() {
            Ok(mut appointments) => {
                sort_by_start(&mut appointments);
                info!(
                    "event=store_load module=store status=ok count={}",
                    appointments.len()
                );
                self.appointments = appointments;
                self.load_issue = None;
                self.preserve_pending = false;
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=degraded fallback=empty error={}",
                    err
                );
                self.appointments = Vec::new();
                self.load_issue = Some(err.to_string());
                self.preserve_pending = true;
            }
        }
        &self.appointments
    }

    /// Writes the full in-memory list to the repository.
    pub fn save_all(&mut self) -> StoreResult<()> {
        self.write_through()?;
        Ok(())
    }

    /// Returns stored appointments that overlap `candidate`, in list order.
    pub fn check(&self, candidate: &Appointment) -> Vec<&Appointment> {
        check_against_all(candidate, &self.appointments)
    }

    /// Validates, inserts, re-sorts and persists `appointment`.
    ///
    /// Overlaps are not checked here; callers decide via `check()` or use
    /// `execute()` to apply the configured policy.
    pub fn add(&mut self, appointment: Appointment) -> StoreResult<&[Appointment]> {
        self.insert(appointment)?;
        Ok(&self.appointments)
    }

    /// Removes the appointment with `id` and persists.
    ///
    /// # Errors
    /// - `NotFound` when no appointment has `id`; nothing is written.
    pub fn delete(&mut self, id: AppointmentId) -> StoreResult<&[Appointment]> {
        let index = self.position_of(id)?;
        self.remove_at(index)?;
        Ok(&self.appointments)
    }

    /// Removes the appointment at list position `index` and persists.
    pub fn delete_at(&mut self, index: usize) -> StoreResult<&[Appointment]> {
        self.remove_at(index)?;
        Ok(&self.appointments)
    }

    /// Routes a presentation command to its handler.
    ///
    /// `Add` applies the store's overlap policy: `Warn` inserts and reports
    /// conflicts, `Block` rejects with `StoreError::Overlap`.
    pub fn execute(&mut self, command: AppointmentCommand) -> StoreResult<CommandOutcome> {
        match command {
            AppointmentCommand::Add(draft) => {
                let appointment = draft.parse()?;
                self.handle_add(appointment)
            }
            AppointmentCommand::Delete(id) => {
                let index = self.position_of(id)?;
                self.handle_delete(index)
            }
            AppointmentCommand::DeleteAt(index) => self.handle_delete(index),
        }
    }

    fn handle_add(&mut self, appointment: Appointment) -> StoreResult<CommandOutcome> {
        let conflicts: Vec<Appointment> = self.check(&appointment).into_iter().cloned().collect();
        if !conflicts.is_empty() {
            if self.overlap_policy == OverlapPolicy::Block {
                info!(
                    "event=appointment_add module=store status=blocked conflicts={}",
                    conflicts.len()
                );
                return Err(StoreError::Overlap(conflicts));
            }
            warn!(
                "event=appointment_add module=store status=overlap conflicts={}",
                conflicts.len()
            );
        }
        self.insert(appointment.clone())?;
        Ok(CommandOutcome::Added {
            appointment,
            conflicts,
        })
    }

    fn handle_delete(&mut self, index: usize) -> StoreResult<CommandOutcome> {
        let appointment = self.remove_at(index)?;
        Ok(CommandOutcome::Deleted { appointment })
    }

    fn insert(&mut self, appointment: Appointment) -> StoreResult<()> {
        appointment.validate()?;
        if self.get(appointment.id).is_some() {
            return Err(StoreError::DuplicateId(appointment.id));
        }

        let previous = self.appointments.clone();
        self.appointments.push(appointment);
        sort_by_start(&mut self.appointments);
        self.persist_or_rollback("appointment_add", previous)
    }

    fn remove_at(&mut self, index: usize) -> StoreResult<Appointment> {
        if index >= self.appointments.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.appointments.len(),
            });
        }

        let previous = self.appointments.clone();
        let removed = self.appointments.remove(index);
        self.persist_or_rollback("appointment_delete", previous)?;
        Ok(removed)
    }

    fn position_of(&self, id: AppointmentId) -> StoreResult<usize> {
        self.appointments
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn persist_or_rollback(
        &mut self,
        event: &'static str,
        previous: Vec<Appointment>,
    ) -> StoreResult<()> {
        match self.write_through() {
            Ok(()) => {
                info!(
                    "event={} module=store status=ok count={}",
                    event,
                    self.appointments.len()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event={} module=store status=rolled_back error={}",
                    event, err
                );
                self.appointments = previous;
                Err(err.into())
            }
        }
    }
}

impl<R: AppointmentRepository> AppointmentStore<R> {
    fn write_through(&mut self) -> Result<(), RepoError> {
        if self.preserve_pending {
            self.repo.preserve_unreadable()?;
            self.preserve_pending = false;
        }
        self.repo.save_all(&self.appointments)
    }
}

fn sort_by_start(appointments: &mut [Appointment]) {
    appointments.sort_by_key(|entry| entry.start);
}
