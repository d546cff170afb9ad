use appointment_core::{check_against_all, overlaps, Appointment};
use chrono::{NaiveDate, NaiveDateTime};

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn appointment(title: &str, start: (u32, u32), end: (u32, u32)) -> Appointment {
    Appointment::new(title, at(start.0, start.1), at(end.0, end.1)).unwrap()
}

fn fixtures() -> Vec<Appointment> {
    vec![
        appointment("Standup", (9, 0), (10, 0)),
        appointment("Quick sync", (9, 30), (9, 45)),
        appointment("Review", (10, 0), (11, 0)),
        appointment("Long block", (8, 0), (12, 0)),
        appointment("Lunch", (12, 0), (13, 0)),
        appointment("Late", (18, 15), (19, 0)),
        appointment("Straddle", (9, 59), (10, 1)),
    ]
}

#[test]
fn overlap_is_symmetric() {
    let all = fixtures();
    for a in &all {
        for b in &all {
            assert_eq!(
                overlaps(a, b),
                overlaps(b, a),
                "{} vs {}",
                a.title,
                b.title
            );
        }
    }
}

#[test]
fn appointment_overlaps_itself() {
    for a in fixtures() {
        assert!(overlaps(&a, &a), "{}", a.title);
    }
}

#[test]
fn touching_endpoints_do_not_overlap() {
    let standup = appointment("Standup", (9, 0), (10, 0));
    let review = appointment("Review", (10, 0), (11, 0));
    let straddle = appointment("Straddle", (9, 59), (10, 1));

    assert!(!overlaps(&standup, &review));
    assert!(overlaps(&straddle, &standup));
    assert!(overlaps(&straddle, &review));
}

#[test]
fn check_against_all_returns_conflicts_in_store_order() {
    let existing = vec![
        appointment("Long block", (8, 0), (12, 0)),
        appointment("Standup", (9, 0), (10, 0)),
        appointment("Lunch", (12, 0), (13, 0)),
    ];
    let candidate = appointment("Quick sync", (9, 30), (9, 45));

    let titles: Vec<&str> = check_against_all(&candidate, &existing)
        .into_iter()
        .map(|entry| entry.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Long block", "Standup"]);
}

#[test]
fn check_against_empty_store_is_clean() {
    let candidate = appointment("Quick sync", (9, 30), (9, 45));
    assert!(check_against_all(&candidate, &[]).is_empty());
}
