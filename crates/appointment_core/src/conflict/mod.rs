//! Scheduling conflict detection.
//!
//! # Responsibility
//! - Answer whether a candidate interval collides with stored appointments.
//!
//! # Invariants
//! - Detection is a pure query; it never mutates or rejects anything.
//! - Whether a conflict blocks an add is decided by the caller.

pub mod overlap;
