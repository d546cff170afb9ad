//! Appointment domain model.
//!
//! # Responsibility
//! - Define the single record kept by the appointment store.
//! - Own the interval invariants every write path relies on.
//!
//! # Invariants
//! - `id` is generated once and never reused for another appointment.
//! - `title` is stored trimmed and is never empty.
//! - `end` is strictly later than `start`; the interval is half-open.
//!
//! # Wire shape
//! - Current: `{ "id", "title", "start", "end" }` with naive ISO-8601
//!   timestamps. `id` may be absent, in which case one is generated on load.
//! - Legacy: `{ "titolo", "data_ora", "durata" }` where `durata` is the
//!   duration in minutes. Accepted on read only.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of an appointment, independent of list position.
pub type AppointmentId = Uuid;

/// Validation failures for appointment construction and raw input parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentValidationError {
    /// `id` is the nil UUID.
    NilId,
    /// `title` is empty after trimming.
    EmptyTitle,
    /// A required raw input field is blank.
    MissingField(&'static str),
    /// A raw date/time field could not be parsed.
    InvalidDateTime { field: &'static str, value: String },
    /// Duration is not a positive whole number of minutes.
    InvalidDuration(String),
    /// `end` is not strictly later than `start`.
    InvalidTimeWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Time slot step does not evenly split a day.
    InvalidSlotStep(u32),
}

impl Display for AppointmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "appointment id must not be nil"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidDateTime { field, value } => {
                write!(f, "invalid {field} date/time `{value}`")
            }
            Self::InvalidDuration(value) => write!(
                f,
                "duration must be a positive number of minutes, got `{value}`"
            ),
            Self::InvalidTimeWindow { start, end } => {
                write!(f, "end ({end}) must be after start ({start})")
            }
            Self::InvalidSlotStep(step) => write!(
                f,
                "slot step {step} must be positive and divide a day evenly"
            ),
        }
    }
}

impl Error for AppointmentValidationError {}

/// A titled half-open time interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredAppointment")]
pub struct Appointment {
    pub id: AppointmentId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Appointment {
    /// Creates a validated appointment with a freshly generated id.
    pub fn new(
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, AppointmentValidationError> {
        Self::with_id(Uuid::new_v4(), title, start, end)
    }

    /// Creates a validated appointment that starts at `start` and lasts
    /// `minutes`.
    pub fn with_duration(
        title: impl Into<String>,
        start: NaiveDateTime,
        minutes: i64,
    ) -> Result<Self, AppointmentValidationError> {
        if minutes <= 0 {
            return Err(AppointmentValidationError::InvalidDuration(
                minutes.to_string(),
            ));
        }
        let end = Duration::try_minutes(minutes)
            .and_then(|duration| start.checked_add_signed(duration))
            .ok_or_else(|| AppointmentValidationError::InvalidDuration(minutes.to_string()))?;
        Self::new(title, start, end)
    }

    /// Creates a validated appointment with a caller-provided id.
    ///
    /// Used by load paths where identity already exists in the backing file.
    pub fn with_id(
        id: AppointmentId,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, AppointmentValidationError> {
        let appointment = Self {
            id,
            title: title.into().trim().to_string(),
            start,
            end,
        };
        appointment.validate()?;
        Ok(appointment)
    }

    /// Checks record invariants.
    ///
    /// Fields are public, so write paths call this again before persisting.
    pub fn validate(&self) -> Result<(), AppointmentValidationError> {
        if self.id.is_nil() {
            return Err(AppointmentValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(AppointmentValidationError::EmptyTitle);
        }
        if self.end <= self.start {
            return Err(AppointmentValidationError::InvalidTimeWindow {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Length of the interval in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Returns whether this appointment has the given title and interval.
    ///
    /// For callers that only hold the visible tuple and not the id.
    pub fn matches(&self, title: &str, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.title == title.trim() && self.start == start && self.end == end
    }
}

impl Display for Appointment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} — {} → {} ({} min)",
            self.title,
            self.start.format("%d/%m %H:%M"),
            self.end.format("%H:%M"),
            self.duration_minutes()
        )
    }
}

/// Accepted on-disk record shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAppointment {
    Current {
        #[serde(default)]
        id: Option<AppointmentId>,
        title: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Legacy {
        titolo: String,
        data_ora: NaiveDateTime,
        durata: i64,
    },
}

impl TryFrom<StoredAppointment> for Appointment {
    type Error = AppointmentValidationError;

    fn try_from(value: StoredAppointment) -> Result<Self, Self::Error> {
        match value {
            StoredAppointment::Current {
                id,
                title,
                start,
                end,
            } => Self::with_id(id.unwrap_or_else(Uuid::new_v4), title, start, end),
            StoredAppointment::Legacy {
                titolo,
                data_ora,
                durata,
            } => Self::with_duration(titolo, data_ora, durata),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Appointment, AppointmentValidationError};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("valid fixture time")
    }

    #[test]
    fn new_trims_title() {
        let appointment = Appointment::new("  Standup ", at(9, 0), at(10, 0)).unwrap();
        assert_eq!(appointment.title, "Standup");
    }

    #[test]
    fn with_duration_rejects_zero_minutes() {
        let err = Appointment::with_duration("Standup", at(9, 0), 0).unwrap_err();
        assert_eq!(err, AppointmentValidationError::InvalidDuration("0".to_string()));
    }

    #[test]
    fn display_shows_day_window_and_minutes() {
        let appointment = Appointment::with_duration("Standup", at(9, 0), 45).unwrap();
        assert_eq!(appointment.to_string(), "Standup — 02/03 09:00 → 09:45 (45 min)");
    }

    #[test]
    fn matches_ignores_surrounding_whitespace_in_title() {
        let appointment = Appointment::new("Standup", at(9, 0), at(10, 0)).unwrap();
        assert!(appointment.matches(" Standup ", at(9, 0), at(10, 0)));
        assert!(!appointment.matches("Standup", at(9, 0), at(9, 30)));
    }
}
