//! Appointment domain model.
//!
//! # Responsibility
//! - Define the canonical appointment record and its validation rules.
//! - Convert raw presentation input into validated records.
//!
//! # Invariants
//! - Every appointment is identified by a stable `AppointmentId`.
//! - Every constructed appointment satisfies `end > start` and has a title.

pub mod appointment;
pub mod draft;
pub mod slots;
