//! Forward projection: given an order detail's current position, predict a
//! realistic completion date from some `from` date.

use chrono::NaiveDate;
use kilnsched_core::{OrderDetail, SchedulerResult, StepKey};

use crate::catalogue;

/// Minimum advertised turnaround, regardless of how short the remaining
/// pipeline actually is.
pub const MINIMUM_PRODUCTION_DAYS: i64 = 21;

/// Predicts when `detail` will realistically finish, starting from `from`.
pub fn calc(detail: &OrderDetail, from: NaiveDate) -> SchedulerResult<NaiveDate> {
    let process = catalogue::process_for(detail.piece_type)?;

    let start_index = if detail.current_step_key == StepKey::Pending {
        0
    } else {
        process
            .iter()
            .position(|s| s.step_key == detail.current_step_key)
            .ok_or_else(|| {
                kilnsched_core::SchedulerError::InvalidStepKey(
                    detail.current_step_key.to_string(),
                )
            })?
    };

    let remaining_quantity = detail.remaining_quantity();
    let mut total_days: i64 = 0;
    for step in &process[start_index..] {
        let work_days = if step.rate > 0.0 {
            (f64::from(remaining_quantity) / step.rate).ceil() as i64
        } else {
            0
        };
        total_days += work_days + step.drying_days;
    }

    let total_days = total_days.max(MINIMUM_PRODUCTION_DAYS);
    Ok(from + chrono::Duration::days(total_days))
}
