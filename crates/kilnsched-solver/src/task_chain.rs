//! Backward scheduling: given an order detail and a target completion date,
//! emit the sequence of tasks still needed, each annotated with the
//! earliest date it may start.

use chrono::NaiveDate;
use kilnsched_core::{SchedulerResult, StepKey, TaskChainItem};
use kilnsched_core::{OrderDetail, SchedulerError};

use crate::catalogue;

/// Hedge against unplanned disruption: the chain is built backward from
/// `target - BUFFER_DAYS`, not from `target` itself.
pub const BUFFER_DAYS: i64 = 3;

/// Builds the backward-scheduled task chain for `detail`, targeting
/// `target_completion`. `now` drives the drying-gate check against
/// `detail.status_changed_at`.
///
/// Returns an empty chain when the current step is still drying (the piece
/// isn't ready to advance this run).
pub fn calc(
    detail: &OrderDetail,
    target_completion: NaiveDate,
    now: NaiveDate,
) -> SchedulerResult<Vec<TaskChainItem>> {
    let process = catalogue::process_for(detail.piece_type)?;

    let current_index = if detail.current_step_key == StepKey::Pending {
        0
    } else {
        let index = process
            .iter()
            .position(|s| s.step_key == detail.current_step_key)
            .ok_or_else(|| SchedulerError::InvalidStepKey(detail.current_step_key.to_string()))?;

        let current_step = &process[index];
        if let Some(changed_at) = detail.status_changed_at {
            let drying_clears = changed_at + chrono::Duration::days(current_step.drying_days);
            if drying_clears > now {
                return Ok(Vec::new());
            }
        }
        index + 1
    };

    let remaining_quantity = detail.remaining_quantity();
    let mut cursor = target_completion - chrono::Duration::days(BUFFER_DAYS);
    let mut items = Vec::new();

    for step in process[current_index..].iter().rev() {
        let work_days = if step.rate > 0.0 {
            (f64::from(remaining_quantity) / step.rate).ceil() as i64
        } else {
            0
        };
        let days_needed = if step.is_external() {
            step.drying_days
        } else {
            work_days + step.drying_days
        };
        let start_date = cursor - chrono::Duration::days(days_needed);

        items.push(TaskChainItem {
            task_type: step.task_type,
            piece_type: detail.piece_type,
            order_detail_id: detail.id.clone(),
            order_detail_step_key: step.step_key,
            quantity: remaining_quantity,
            start_date,
        });

        cursor = start_date;
    }

    items.reverse();
    Ok(items)
}
