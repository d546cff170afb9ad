//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the whole-list persistence contract used by the store.
//! - Isolate file format and I/O details from store orchestration.
//!
//! # Invariants
//! - Loaded records have passed `Appointment::validate()` during decoding.
//! - Repository APIs return typed errors; degrading to an empty list is the
//!   store's decision, not the repository's.

pub mod appointment_repo;
