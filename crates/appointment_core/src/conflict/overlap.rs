//! Half-open interval overlap checks.
//!
//! # Invariants
//! - `[a.start, a.end)` and `[b.start, b.end)` overlap iff
//!   `a.start < b.end && b.start < a.end`.
//! - Touching endpoints (`a.end == b.start`) do not overlap.
//! - An appointment is never reported as conflicting with itself by id.

use crate::model::appointment::Appointment;

/// Returns whether two appointments share any instant.
pub fn overlaps(candidate: &Appointment, existing: &Appointment) -> bool {
    candidate.start < existing.end && existing.start < candidate.end
}

/// Returns every entry of `existing` that overlaps `candidate`, in input order.
///
/// Entries sharing the candidate's id are skipped, so re-checking a stored
/// appointment against its own store reports only real collisions.
pub fn check_against_all<'a>(
    candidate: &Appointment,
    existing: &'a [Appointment],
) -> Vec<&'a Appointment> {
    existing
        .iter()
        .filter(|entry| entry.id != candidate.id && overlaps(candidate, entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{check_against_all, overlaps};
    use crate::model::appointment::Appointment;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("valid fixture time")
    }

    fn slot(title: &str, start: (u32, u32), end: (u32, u32)) -> Appointment {
        Appointment::new(title, at(start.0, start.1), at(end.0, end.1)).unwrap()
    }

    #[test]
    fn contained_interval_overlaps() {
        let outer = slot("Standup", (9, 0), (10, 0));
        let inner = slot("Quick sync", (9, 30), (9, 45));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn adjacent_intervals_do_not_overlap() {
        let first = slot("Standup", (9, 0), (10, 0));
        let second = slot("Review", (10, 0), (11, 0));
        assert!(!overlaps(&first, &second));
        assert!(!overlaps(&second, &first));
    }

    #[test]
    fn check_skips_same_id() {
        let standup = slot("Standup", (9, 0), (10, 0));
        let existing = vec![standup.clone()];
        assert!(check_against_all(&standup, &existing).is_empty());
    }
}
