//! FFI use-case API for GUI-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level appointment functions via FRB.
//! - Translate core results into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens the store, runs one command and returns; no store
//!   instance outlives a call.
//! - Only the backing file path is process-wide, and it is fixed once set.

use appointment_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    time_slots as time_slots_inner, Appointment, AppointmentCommand, AppointmentDraft,
    AppointmentStore, CommandOutcome, JsonFileAppointmentRepository, OverlapPolicy, StoreConfig,
    StoreError,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

static STORE_FILE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Sets the backing file used by every later call.
///
/// Without this call the store uses `appointments.json` in the working
/// directory. Calls made before configuration read that default without
/// fixing it, so a later `store_configure` still takes effect.
///
/// # FFI contract
/// - Returns empty string on success and error message on failure.
/// - Repeating the same path is accepted; switching paths is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn store_configure(file_path: String) -> String {
    configure_path(&STORE_FILE_PATH, &file_path)
}

fn configure_path(slot: &OnceLock<PathBuf>, file_path: &str) -> String {
    let trimmed = file_path.trim();
    if trimmed.is_empty() {
        return "file_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = slot.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "store already uses `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One appointment row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentItem {
    /// Stable appointment ID in string form.
    pub id: String,
    pub title: String,
    /// Naive ISO-8601 start, `YYYY-MM-DDTHH:MM:SS`.
    pub start: String,
    /// Naive ISO-8601 end, `YYYY-MM-DDTHH:MM:SS`.
    pub end: String,
    /// Ready-to-display line, e.g. `Standup — 02/03 09:00 → 10:00 (60 min)`.
    pub label: String,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentListResponse {
    /// Appointments sorted by start.
    pub items: Vec<AppointmentItem>,
    /// Human-readable message; carries the load warning when the backing
    /// file could not be read.
    pub message: String,
}

/// Generic action response envelope for add/delete/check flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// ID of the appointment added or deleted.
    pub appointment_id: Option<String>,
    /// Overlapping appointments, for warning or blocking dialogs.
    pub conflicts: Vec<AppointmentItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl AppointmentActionResponse {
    fn success(message: impl Into<String>, outcome: &CommandOutcome) -> Self {
        Self {
            ok: true,
            appointment_id: Some(outcome.appointment().id.to_string()),
            conflicts: outcome.conflicts().iter().map(to_item).collect(),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            appointment_id: None,
            conflicts: Vec::new(),
            message: message.into(),
        }
    }
}

/// Lists stored appointments.
///
/// # FFI contract
/// - Never fails; an unreadable file yields an empty list plus a message.
#[flutter_rust_bridge::frb(sync)]
pub fn appointments_list() -> AppointmentListResponse {
    let store = open_store(OverlapPolicy::Warn);
    let items = store.appointments().iter().map(to_item).collect::<Vec<_>>();
    let message = match store.load_issue() {
        Some(issue) => format!("Could not load saved appointments: {issue}"),
        None if items.is_empty() => "No appointments.".to_string(),
        None => format!("{} appointment(s).", items.len()),
    };
    AppointmentListResponse { items, message }
}

/// Adds an appointment from raw form fields.
///
/// Input semantics:
/// - `start` / `end`: `YYYY-MM-DDTHH:MM[:SS]`, `YYYY-MM-DD HH:MM[:SS]` or
///   `dd/mm/YYYY HH:MM`.
/// - Provide `end` or `duration_minutes`; `end` wins when both are set.
/// - `block_overlaps`: reject instead of warn when the slot is taken.
///
/// # FFI contract
/// - Never panics.
/// - On success `conflicts` lists overlaps the UI should warn about.
/// - On a blocked overlap `ok=false` and `conflicts` lists the collisions.
#[flutter_rust_bridge::frb(sync)]
pub fn appointment_add(
    title: String,
    start: String,
    end: Option<String>,
    duration_minutes: Option<u32>,
    block_overlaps: bool,
) -> AppointmentActionResponse {
    let policy = if block_overlaps {
        OverlapPolicy::Block
    } else {
        OverlapPolicy::Warn
    };
    let draft = AppointmentDraft {
        title,
        start,
        end,
        duration_minutes: duration_minutes.map(|minutes| minutes.to_string()),
    };

    let mut store = open_store(policy);
    match store.execute(AppointmentCommand::Add(draft)) {
        Ok(outcome) if outcome.conflicts().is_empty() => {
            AppointmentActionResponse::success("Appointment added.", &outcome)
        }
        Ok(outcome) => AppointmentActionResponse::success(
            format!(
                "Appointment added; overlaps {} existing appointment(s).",
                outcome.conflicts().len()
            ),
            &outcome,
        ),
        Err(StoreError::Overlap(conflicts)) => AppointmentActionResponse {
            conflicts: conflicts.iter().map(to_item).collect(),
            ..AppointmentActionResponse::failure(format!(
                "appointment_add blocked: overlaps {} existing appointment(s)",
                conflicts.len()
            ))
        },
        Err(err) => AppointmentActionResponse::failure(format!("appointment_add failed: {err}")),
    }
}

/// Checks raw form fields against stored appointments without adding.
///
/// # FFI contract
/// - `ok=false` only for unparsable input.
/// - `appointment_id` is always `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn appointment_check(
    title: String,
    start: String,
    end: Option<String>,
    duration_minutes: Option<u32>,
) -> AppointmentActionResponse {
    let draft = AppointmentDraft {
        title,
        start,
        end,
        duration_minutes: duration_minutes.map(|minutes| minutes.to_string()),
    };
    let candidate = match draft.parse() {
        Ok(candidate) => candidate,
        Err(err) => {
            return AppointmentActionResponse::failure(format!("appointment_check failed: {err}"))
        }
    };

    let store = open_store(OverlapPolicy::Warn);
    let conflicts = store
        .check(&candidate)
        .into_iter()
        .map(to_item)
        .collect::<Vec<_>>();
    let message = if conflicts.is_empty() {
        "Slot is free.".to_string()
    } else {
        format!("Overlaps {} existing appointment(s).", conflicts.len())
    };
    AppointmentActionResponse {
        ok: true,
        appointment_id: None,
        conflicts,
        message,
    }
}

/// Deletes an appointment by its stable ID.
#[flutter_rust_bridge::frb(sync)]
pub fn appointment_delete(appointment_id: String) -> AppointmentActionResponse {
    let id = match Uuid::parse_str(appointment_id.trim()) {
        Ok(id) => id,
        Err(err) => {
            return AppointmentActionResponse::failure(format!(
                "appointment_delete failed: invalid id `{}`: {err}",
                appointment_id.trim()
            ))
        }
    };
    run_delete(AppointmentCommand::Delete(id))
}

/// Deletes the appointment at a list row, as shown by `appointments_list`.
#[flutter_rust_bridge::frb(sync)]
pub fn appointment_delete_at(index: u32) -> AppointmentActionResponse {
    run_delete(AppointmentCommand::DeleteAt(index as usize))
}

/// `HH:MM` start-time choices for a picker; empty for an invalid step.
#[flutter_rust_bridge::frb(sync)]
pub fn time_slots(step_minutes: u32) -> Vec<String> {
    time_slots_inner(step_minutes).unwrap_or_else(|err| {
        warn!("event=time_slots module=ffi status=error error={}", err);
        Vec::new()
    })
}

fn run_delete(command: AppointmentCommand) -> AppointmentActionResponse {
    let mut store = open_store(OverlapPolicy::Warn);
    match store.execute(command) {
        Ok(outcome) => AppointmentActionResponse::success("Appointment deleted.", &outcome),
        Err(err) => AppointmentActionResponse::failure(format!("appointment_delete failed: {err}")),
    }
}

fn resolve_store_path() -> PathBuf {
    resolve_path(&STORE_FILE_PATH)
}

fn resolve_path(slot: &OnceLock<PathBuf>) -> PathBuf {
    slot.get()
        .cloned()
        .unwrap_or_else(|| StoreConfig::default().file_path)
}

fn open_store(policy: OverlapPolicy) -> AppointmentStore<JsonFileAppointmentRepository> {
    let config = StoreConfig::default()
        .with_file(resolve_store_path())
        .with_policy(policy);
    AppointmentStore::from_config(&config)
}

fn to_item(appointment: &Appointment) -> AppointmentItem {
    AppointmentItem {
        id: appointment.id.to_string(),
        title: appointment.title.clone(),
        start: appointment.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
        end: appointment.end.format("%Y-%m-%dT%H:%M:%S").to_string(),
        label: appointment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        appointment_add, appointment_check, appointment_delete, appointment_delete_at,
        appointments_list, configure_path, core_version, init_logging, ping, resolve_path,
        store_configure, time_slots,
    };
    use appointment_core::DEFAULT_FILE_NAME;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use std::time::{SystemTime, UNIX_EPOCH};

    static STORE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    static TEST_FILE: OnceLock<PathBuf> = OnceLock::new();

    // Every test shares one backing file; serialize access and start clean.
    fn fresh_store() -> MutexGuard<'static, ()> {
        let guard = STORE_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let path = TEST_FILE.get_or_init(|| {
            std::env::temp_dir().join(format!(
                "appointment-ffi-{}-{}.json",
                std::process::id(),
                unique_suffix()
            ))
        });
        assert_eq!(store_configure(path.display().to_string()), "");
        let _ = std::fs::remove_file(path);
        guard
    }

    fn unique_suffix() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn reading_the_default_path_does_not_pin_it() {
        let slot = OnceLock::new();
        assert_eq!(resolve_path(&slot), PathBuf::from(DEFAULT_FILE_NAME));
        assert_eq!(resolve_path(&slot), PathBuf::from(DEFAULT_FILE_NAME));

        assert_eq!(configure_path(&slot, "/data/mine.json"), "");
        assert_eq!(resolve_path(&slot), PathBuf::from("/data/mine.json"));
        assert!(configure_path(&slot, "/data/other.json").contains("refusing to switch"));
    }

    #[test]
    fn store_configure_rejects_switching_paths() {
        let _guard = fresh_store();
        assert!(!store_configure(String::new()).is_empty());
        let error = store_configure("/somewhere/else.json".to_string());
        assert!(error.contains("refusing to switch"));
    }

    #[test]
    fn add_then_list_returns_sorted_items() {
        let _guard = fresh_store();

        let lunch = appointment_add(
            "Lunch".to_string(),
            "2026-03-02T12:00".to_string(),
            None,
            Some(60),
            false,
        );
        assert!(lunch.ok, "{}", lunch.message);
        let standup = appointment_add(
            "Standup".to_string(),
            "02/03/2026 09:00".to_string(),
            Some("2026-03-02 10:00".to_string()),
            None,
            false,
        );
        assert!(standup.ok, "{}", standup.message);
        assert!(standup.conflicts.is_empty());

        let listed = appointments_list();
        let titles: Vec<&str> = listed.items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["Standup", "Lunch"]);
        assert_eq!(listed.items[0].start, "2026-03-02T09:00:00");
        assert_eq!(listed.items[0].label, "Standup — 02/03 09:00 → 10:00 (60 min)");
    }

    #[test]
    fn overlapping_add_warns_or_blocks() {
        let _guard = fresh_store();
        let standup = appointment_add(
            "Standup".to_string(),
            "2026-03-02T09:00".to_string(),
            None,
            Some(60),
            false,
        );
        assert!(standup.ok, "{}", standup.message);

        let blocked = appointment_add(
            "Quick sync".to_string(),
            "2026-03-02T09:30".to_string(),
            None,
            Some(15),
            true,
        );
        assert!(!blocked.ok);
        assert_eq!(blocked.conflicts.len(), 1);
        assert_eq!(appointments_list().items.len(), 1);

        let warned = appointment_add(
            "Quick sync".to_string(),
            "2026-03-02T09:30".to_string(),
            None,
            Some(15),
            false,
        );
        assert!(warned.ok, "{}", warned.message);
        assert_eq!(warned.conflicts[0].title, "Standup");
        assert_eq!(appointments_list().items.len(), 2);
    }

    #[test]
    fn check_reports_conflicts_without_adding() {
        let _guard = fresh_store();
        appointment_add(
            "Standup".to_string(),
            "2026-03-02T09:00".to_string(),
            None,
            Some(60),
            false,
        );

        let busy = appointment_check(
            "Quick sync".to_string(),
            "2026-03-02T09:30".to_string(),
            Some("2026-03-02T09:45".to_string()),
            None,
        );
        assert!(busy.ok);
        assert_eq!(busy.conflicts.len(), 1);

        let free = appointment_check(
            "Review".to_string(),
            "2026-03-02T10:00".to_string(),
            None,
            Some(30),
        );
        assert!(free.ok);
        assert!(free.conflicts.is_empty());
        assert_eq!(appointments_list().items.len(), 1);
    }

    #[test]
    fn add_rejects_reversed_time_range() {
        let _guard = fresh_store();
        let response = appointment_add(
            "bad range".to_string(),
            "2026-03-02T10:00".to_string(),
            Some("2026-03-02T09:00".to_string()),
            None,
            false,
        );
        assert!(!response.ok);
        assert!(response.message.contains("must be after start"));
        assert!(appointments_list().items.is_empty());
    }

    #[test]
    fn delete_by_id_and_by_row() {
        let _guard = fresh_store();
        let standup = appointment_add(
            "Standup".to_string(),
            "2026-03-02T09:00".to_string(),
            None,
            Some(60),
            false,
        );
        appointment_add(
            "Lunch".to_string(),
            "2026-03-02T12:00".to_string(),
            None,
            Some(60),
            false,
        );

        let id = standup.appointment_id.expect("add should return id");
        let deleted = appointment_delete(id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.appointment_id, Some(id.clone()));

        let again = appointment_delete(id);
        assert!(!again.ok);
        assert!(again.message.contains("not found"));

        assert!(appointment_delete_at(0).ok);
        assert!(!appointment_delete_at(0).ok);
        assert!(!appointment_delete("not-a-uuid".to_string()).ok);
    }

    #[test]
    fn corrupt_file_lists_empty_with_message() {
        let _guard = fresh_store();
        let path = TEST_FILE.get().expect("test file configured");
        std::fs::write(path, "[{]").unwrap();

        let listed = appointments_list();
        assert!(listed.items.is_empty());
        assert!(listed.message.starts_with("Could not load"));
    }

    #[test]
    fn time_slots_returns_empty_for_bad_step() {
        assert_eq!(time_slots(60).len(), 24);
        assert!(time_slots(0).is_empty());
    }
}
