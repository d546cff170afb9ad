//! Core domain logic for the appointment manager.
//! This crate is the single source of truth for appointment invariants.

pub mod config;
pub mod conflict;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{OverlapPolicy, StoreConfig, DEFAULT_FILE_NAME};
pub use conflict::overlap::{check_against_all, overlaps};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::appointment::{Appointment, AppointmentId, AppointmentValidationError};
pub use model::draft::{parse_date_time, AppointmentDraft};
pub use model::slots::{time_slots, DEFAULT_SLOT_STEP_MINUTES};
pub use repo::appointment_repo::{
    AppointmentRepository, JsonFileAppointmentRepository, RepoError, RepoResult,
};
pub use service::appointment_store::{AppointmentStore, StoreError, StoreResult};
pub use service::command::{AppointmentCommand, CommandOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
