//! Start-time choices for pickers.

use super::appointment::AppointmentValidationError;

/// Step used by the default time picker.
pub const DEFAULT_SLOT_STEP_MINUTES: u32 = 30;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Returns `HH:MM` labels covering one day at `step_minutes` intervals.
///
/// The step must be positive and divide a day evenly, so the list always
/// starts at `00:00` and never runs past midnight.
pub fn time_slots(step_minutes: u32) -> Result<Vec<String>, AppointmentValidationError> {
    if step_minutes == 0 || MINUTES_PER_DAY % step_minutes != 0 {
        return Err(AppointmentValidationError::InvalidSlotStep(step_minutes));
    }

    Ok((0..MINUTES_PER_DAY)
        .step_by(step_minutes as usize)
        .map(|minute| format!("{:02}:{:02}", minute / 60, minute % 60))
        .collect())
}
