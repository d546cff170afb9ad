//! FRB bindings for the appointment manager front end.

pub mod api;
