//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, overlap checks and persistence into
//!   presentation-level operations.
//! - Keep UI/FFI layers decoupled from file format details.

pub mod appointment_store;
pub mod command;
