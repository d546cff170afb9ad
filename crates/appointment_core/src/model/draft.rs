//! Raw presentation input for a candidate appointment.
//!
//! # Responsibility
//! - Carry form field values exactly as typed or picked by the user.
//! - Turn them into a validated `Appointment` or a field-level error.
//!
//! # Invariants
//! - Parsing never panics on user input.
//! - Exactly one of `end` / `duration_minutes` drives the end of the interval;
//!   `end` wins when both are filled.

use super::appointment::{Appointment, AppointmentValidationError};
use chrono::NaiveDateTime;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
];

/// Unparsed field values for a new appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub duration_minutes: Option<String>,
}

impl AppointmentDraft {
    /// Draft with an explicit end date/time.
    pub fn with_end(
        title: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start: start.into(),
            end: Some(end.into()),
            duration_minutes: None,
        }
    }

    /// Draft with a duration in minutes instead of an end.
    pub fn with_duration(
        title: impl Into<String>,
        start: impl Into<String>,
        duration_minutes: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start: start.into(),
            end: None,
            duration_minutes: Some(duration_minutes.into()),
        }
    }

    /// Parses and validates the draft into an appointment with a new id.
    ///
    /// # Errors
    /// - `EmptyTitle` / `MissingField` for blank required fields.
    /// - `InvalidDateTime` when `start` or `end` matches no accepted format.
    /// - `InvalidDuration` for non-numeric or non-positive durations.
    /// - `InvalidTimeWindow` when the end is not after the start.
    pub fn parse(&self) -> Result<Appointment, AppointmentValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppointmentValidationError::EmptyTitle);
        }
        let start = parse_date_time("start", &self.start)?;

        if let Some(end) = non_blank(self.end.as_deref()) {
            let end = parse_date_time("end", end)?;
            return Appointment::new(title, start, end);
        }

        let Some(raw_minutes) = non_blank(self.duration_minutes.as_deref()) else {
            return Err(AppointmentValidationError::MissingField("end or duration"));
        };
        let minutes = raw_minutes
            .parse::<i64>()
            .map_err(|_| AppointmentValidationError::InvalidDuration(raw_minutes.to_string()))?;
        Appointment::with_duration(title, start, minutes)
    }
}

/// Parses a naive local date/time from any accepted input format.
///
/// Accepted: `YYYY-MM-DDTHH:MM[:SS]`, `YYYY-MM-DD HH:MM[:SS]`, `dd/mm/YYYY HH:MM`.
pub fn parse_date_time(
    field: &'static str,
    value: &str,
) -> Result<NaiveDateTime, AppointmentValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppointmentValidationError::MissingField(field));
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| AppointmentValidationError::InvalidDateTime {
            field,
            value: trimmed.to_string(),
        })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{parse_date_time, AppointmentDraft};
    use crate::model::appointment::AppointmentValidationError;

    #[test]
    fn parse_date_time_accepts_all_formats() {
        let expected = parse_date_time("start", "2026-03-02T09:30:00").unwrap();
        for raw in [
            "2026-03-02T09:30",
            "2026-03-02 09:30",
            "2026-03-02 09:30:00",
            "02/03/2026 09:30",
            "  2026-03-02T09:30  ",
        ] {
            assert_eq!(parse_date_time("start", raw).unwrap(), expected, "{raw}");
        }
    }

    #[test]
    fn parse_date_time_reports_field_and_value() {
        let err = parse_date_time("end", "tomorrow").unwrap_err();
        assert_eq!(
            err,
            AppointmentValidationError::InvalidDateTime {
                field: "end",
                value: "tomorrow".to_string(),
            }
        );
    }

    #[test]
    fn draft_requires_end_or_duration() {
        let draft = AppointmentDraft {
            title: "Standup".to_string(),
            start: "2026-03-02T09:00".to_string(),
            end: Some("   ".to_string()),
            duration_minutes: None,
        };
        assert_eq!(
            draft.parse().unwrap_err(),
            AppointmentValidationError::MissingField("end or duration")
        );
    }

    #[test]
    fn draft_rejects_non_numeric_duration() {
        let draft = AppointmentDraft::with_duration("Standup", "2026-03-02T09:00", "half an hour");
        assert_eq!(
            draft.parse().unwrap_err(),
            AppointmentValidationError::InvalidDuration("half an hour".to_string())
        );
    }

    #[test]
    fn draft_prefers_end_over_duration() {
        let draft = AppointmentDraft {
            title: "Standup".to_string(),
            start: "2026-03-02T09:00".to_string(),
            end: Some("2026-03-02T09:15".to_string()),
            duration_minutes: Some("60".to_string()),
        };
        assert_eq!(draft.parse().unwrap().duration_minutes(), 15);
    }

    #[test]
    fn draft_rejects_blank_title_before_parsing_dates() {
        let draft = AppointmentDraft::with_end(" ", "not a date", "also not");
        assert_eq!(draft.parse().unwrap_err(), AppointmentValidationError::EmptyTitle);
    }
}
