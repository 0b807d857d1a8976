//! The main scheduling loop: purges the stale plan, fetches orders in two
//! priority tiers, builds their task chains, and packs them into the
//! planning horizon under capacity and focus-mode constraints.

use std::collections::HashMap;

use chrono::{NaiveDate, Weekday};
use kilnsched_core::{
    DaySchedule, OrderDetailId, PieceType, SchedulerResult, StepKey, TaskChainItem, TaskRecord,
    TaskType,
};
use kilnsched_store::SchedulerStore;

use crate::{availability::AvailabilityService, catalogue, completion_date, estimator, task_chain};

/// Allowed overbooking past a day's raw capacity, to avoid fragmenting a
/// task across days for the sake of a few minutes.
const OVERCOMMIT_FACTOR: f64 = 1.1;

/// `startDate = today + 1`, pushed past Sunday (zero capacity, nothing to
/// gain by starting the horizon there); `endDate` is the following Saturday.
pub fn horizon_for(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let mut start = today + chrono::Duration::days(1);
    if start.weekday() == Weekday::Sun {
        start += chrono::Duration::days(1);
    }
    let mut end = start;
    while end.weekday() != Weekday::Sat {
        end += chrono::Duration::days(1);
    }
    (start, end)
}

/// Runs one scheduler invocation: builds a fresh plan over the planning
/// horizon starting from `now` and writes it via `store`, purging whatever
/// pending plan existed before.
pub fn run(store: &mut dyn SchedulerStore, now: NaiveDate) -> SchedulerResult<()> {
    let (horizon_start, horizon_end) = horizon_for(now);

    let mut days = Vec::new();
    {
        let mut availability = AvailabilityService::new(store);
        let mut date = horizon_start;
        while date <= horizon_end {
            let hours = availability.for_date(date)?;
            days.push(DaySchedule::empty(date, hours));
            date += chrono::Duration::days(1);
        }
    }

    // Phase 1 — fetch and chain deadline orders.
    let deadline_orders = store.list_open_orders_with_deadlines()?;
    let mut deadline_tasks = Vec::new();
    for order in &deadline_orders {
        let due_date = order
            .due_date
            .expect("list_open_orders_with_deadlines only returns orders with a due date");
        for detail in &order.details {
            let chain = task_chain::calc(detail, due_date, now)?;
            deadline_tasks.extend(chain.into_iter().filter(|item| item.quantity > 0));
        }
    }
    tracing::debug!(count = deadline_tasks.len(), "chained deadline tasks");

    // Phase 2 — pack deadline tasks day by day.
    let mut last_completion: HashMap<OrderDetailId, NaiveDate> = HashMap::new();
    for day in &mut days {
        deadline_tasks = pack_day(
            day,
            std::mem::take(&mut deadline_tasks),
            horizon_start,
            horizon_end,
            &mut last_completion,
        );
    }
    if !deadline_tasks.is_empty() {
        tracing::info!(
            count = deadline_tasks.len(),
            "deadline tasks could not fit in this horizon"
        );
    }

    // Phase 3 — fetch and chain non-deadline orders.
    let non_deadline_orders = store.list_open_orders_without_deadlines()?;
    let mut non_deadline_tasks = Vec::new();
    for order in &non_deadline_orders {
        for detail in &order.details {
            let target = completion_date::calc(detail, now)?;
            let chain = task_chain::calc(detail, target, now)?;
            non_deadline_tasks.extend(chain.into_iter().filter(|item| item.quantity > 0));
        }
    }
    tracing::debug!(count = non_deadline_tasks.len(), "chained non-deadline tasks");

    // Phase 4 — pack non-deadline tasks into remaining slack.
    for day in &mut days {
        non_deadline_tasks = pack_day(
            day,
            std::mem::take(&mut non_deadline_tasks),
            horizon_start,
            horizon_end,
            &mut last_completion,
        );
    }

    // Phase 0 + Phase 5 — purge the stale pending plan and persist the new
    // one as a single logical transaction.
    let all_tasks: Vec<TaskRecord> = days.iter().flat_map(|d| d.tasks.clone()).collect();
    store.purge_and_insert(&all_tasks)?;

    tracing::info!(
        horizon_start = %horizon_start,
        horizon_end = %horizon_end,
        tasks = all_tasks.len(),
        "scheduler run complete"
    );
    Ok(())
}

/// Packs one day's worth of tasks from `tasks`, mutating `day` in place and
/// returning the tasks that didn't fully consume (carried to a later day).
/// This is shared by Phase 2 and Phase 4: called twice per day, once per
/// priority tier, against the same `DaySchedule` and `last_completion` map.
fn pack_day(
    day: &mut DaySchedule,
    tasks: Vec<TaskChainItem>,
    horizon_start: NaiveDate,
    horizon_end: NaiveDate,
    last_completion: &mut HashMap<OrderDetailId, NaiveDate>,
) -> Vec<TaskChainItem> {
    if day.available_hours <= 0.0 {
        return tasks;
    }

    let is_last_day = day.date == horizon_end;
    let mut capacity = day.available_hours;
    let mut residual = Vec::with_capacity(tasks.len());
    let mut broke_for_today = false;

    for task in tasks {
        if broke_for_today {
            residual.push(task);
            continue;
        }

        let earliest_start = last_completion
            .get(&task.order_detail_id)
            .copied()
            .map_or(task.start_date, |lc| lc.max(task.start_date));

        if earliest_start > day.date {
            if !is_last_day {
                residual.push(task);
            }
            continue;
        }

        let is_external = task.task_type.is_external();

        if !is_external {
            match day.mode {
                None => day.mode = Some(task.order_detail_step_key),
                Some(mode) if mode != task.order_detail_step_key => {
                    residual.push(task);
                    continue;
                }
                _ => {}
            }
        }

        if capacity <= 0.0 && !is_external {
            broke_for_today = true;
            residual.push(task);
            continue;
        }

        let mut pieces =
            estimator::quantity_for(task.task_type, task.piece_type, capacity).min(task.quantity);
        let mut hours_used = estimator::hours_for(task.task_type, task.piece_type, pieces);

        if pieces == 0 && task.quantity > 0 {
            pieces = task.quantity;
            hours_used = estimator::hours_for(task.task_type, task.piece_type, pieces);
        }

        if pieces == 0 {
            residual.push(task);
            continue;
        }

        if hours_used > capacity * OVERCOMMIT_FACTOR {
            residual.push(task);
            continue;
        }

        day.tasks.push(TaskRecord {
            order_detail_id: task.order_detail_id.clone(),
            date: day.date,
            task_type: task.task_type,
            quantity: pieces,
            estimated_hours: hours_used,
            is_late: task.start_date < horizon_start,
        });
        capacity -= hours_used;

        last_completion.insert(
            task.order_detail_id.clone(),
            completion_for_placement(day.date, task.order_detail_step_key, task.piece_type, pieces),
        );

        if pieces < task.quantity {
            let mut remainder = task;
            remainder.quantity -= pieces;
            residual.push(remainder);
        }
    }

    day.available_hours = capacity;
    residual
}

/// The date an order detail's `lastCompletion` advances to once `quantity`
/// pieces at `step_key` are placed on `date`.
///
/// Looked up by step key, not task type: `Trim` occurs twice in some
/// processes (`Trim` drying 1 day, `TrimFinal` drying 3), and resolving by
/// task type alone would collapse the two into whichever comes first.
fn completion_for_placement(
    date: NaiveDate,
    step_key: StepKey,
    piece_type: PieceType,
    quantity: u32,
) -> NaiveDate {
    match catalogue::step_for_key(piece_type, step_key) {
        Ok(step) => {
            let work_days = if step.rate > 0.0 {
                (f64::from(quantity) / step.rate).ceil() as i64
            } else {
                0
            };
            date + chrono::Duration::days(work_days + step.drying_days)
        }
        Err(_) => date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kilnsched_core::{Order, OrderDetail, OrderStatus, PieceType, StepKey, TaskChainItem};
    use kilnsched_store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn detail(id: &str, piece_type: PieceType, quantity: u32, step: StepKey) -> OrderDetail {
        OrderDetail {
            id: id.into(),
            order_id: "o1".into(),
            piece_type,
            quantity,
            completed_quantity: 0,
            current_step_key: step,
            status_changed_at: None,
        }
    }

    fn order(id: &str, due_date: Option<NaiveDate>, details: Vec<OrderDetail>) -> Order {
        Order {
            id: id.into(),
            customer_id: "cust-1".into(),
            due_date,
            timeline: None,
            status: OrderStatus::Pending,
            details,
        }
    }

    #[test]
    fn horizon_follows_today_plus_one_through_saturday() {
        let monday = NaiveDate::from_ymd_opt(2025, 10, 13).unwrap();
        let (start, end) = horizon_for(monday);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 10, 14).unwrap());
        assert_eq!(end.weekday(), Weekday::Sat);
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 10, 18).unwrap());
    }

    #[test]
    fn horizon_skips_sunday_when_tomorrow_lands_there() {
        let saturday = NaiveDate::from_ymd_opt(2025, 10, 18).unwrap();
        let (start, _end) = horizon_for(saturday);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 10, 20).unwrap());
    }

    // Scenario A — a small deadline order fits in one Monday.
    #[test]
    fn scenario_a_small_deadline_order_fits_monday() {
        // Chosen so the chain's Build start lands exactly on the horizon's
        // first day: qty5 through MugWithHandle's process is a 26-day chain
        // (23 production days + the 3-day buffer) back from the due date.
        let due = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        let now = NaiveDate::from_ymd_opt(2025, 10, 19).unwrap();
        let mut store = MemoryStore::with_orders(vec![order(
            "o1",
            Some(due),
            vec![detail("d1", PieceType::MugWithHandle, 5, StepKey::Pending)],
        )]);
        run(&mut store, now).unwrap();

        let tasks = store.all_tasks();
        let monday = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        let monday_tasks: Vec<_> = tasks.iter().filter(|t| t.date == monday).collect();
        assert_eq!(monday_tasks.len(), 1);
        assert_eq!(monday_tasks[0].task_type, TaskType::BuildBase);
        assert_eq!(monday_tasks[0].quantity, 5);
        assert_eq!(monday_tasks[0].estimated_hours, 4.0);
        assert!(!monday_tasks[0].is_late);
    }

    // Scenario B — quantity split across two days by capacity.
    #[test]
    fn scenario_b_quantity_splits_across_days() {
        // qty10 needs 2 Build work-days (ceil(10/5)), extending the chain to
        // 28 days back from the due date; chosen so Build starts Monday.
        let due = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
        let now = NaiveDate::from_ymd_opt(2025, 10, 19).unwrap();
        let mut store = MemoryStore::with_orders(vec![order(
            "o1",
            Some(due),
            vec![detail("d1", PieceType::MugWithHandle, 10, StepKey::Pending)],
        )]);
        // Zero out the rest of the horizon so the remainder genuinely has
        // nowhere left to go this week, matching the scenario's intent.
        let wed = NaiveDate::from_ymd_opt(2025, 10, 22).unwrap();
        let sat = NaiveDate::from_ymd_opt(2025, 10, 25).unwrap();
        let mut date = wed;
        let mut zeroed = Vec::new();
        while date <= sat {
            zeroed.push(kilnsched_core::AvailabilityUpdate {
                date,
                available_hours: 0.0,
                notes: None,
            });
            date += chrono::Duration::days(1);
        }
        store.seed_availability(zeroed);
        run(&mut store, now).unwrap();

        let tasks = store.all_tasks();
        let monday = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2025, 10, 21).unwrap();

        let mon: Vec<_> = tasks.iter().filter(|t| t.date == monday).collect();
        let tue: Vec<_> = tasks.iter().filter(|t| t.date == tuesday).collect();
        assert_eq!(mon.len(), 1);
        assert_eq!(mon[0].quantity, 5);
        assert_eq!(mon[0].estimated_hours, 4.0);
        assert_eq!(tue.len(), 1);
        assert_eq!(tue[0].quantity, 2);
        assert_eq!(tue[0].estimated_hours, 1.6);
        assert_eq!(tasks.len(), 2, "the remaining 3 mugs have no capacity left this week");
    }

    // Scenario C — an external process shares a work day: Bisque doesn't set
    // dayMode and costs no hours, while Build does both.
    #[test]
    fn scenario_c_external_process_shares_work_day() {
        let thursday = NaiveDate::from_ymd_opt(2025, 10, 23).unwrap();
        let mut day = DaySchedule::empty(thursday, 4.0);
        let horizon_start = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        let horizon_end = NaiveDate::from_ymd_opt(2025, 10, 25).unwrap();
        let mut last_completion = HashMap::new();

        let tasks = vec![
            TaskChainItem {
                task_type: TaskType::Bisque,
                piece_type: PieceType::MugWithHandle,
                order_detail_id: "a".into(),
                order_detail_step_key: StepKey::Bisque,
                quantity: 20,
                start_date: thursday,
            },
            TaskChainItem {
                task_type: TaskType::BuildBase,
                piece_type: PieceType::MugWithHandle,
                order_detail_id: "b".into(),
                order_detail_step_key: StepKey::Build,
                quantity: 5,
                start_date: thursday,
            },
        ];

        let residual = pack_day(&mut day, tasks, horizon_start, horizon_end, &mut last_completion);
        assert!(residual.is_empty());
        assert_eq!(day.tasks.len(), 2);
        assert_eq!(day.mode, Some(StepKey::Build));

        let bisque = day.tasks.iter().find(|t| t.task_type == TaskType::Bisque).unwrap();
        assert_eq!(bisque.quantity, 20);
        assert_eq!(bisque.estimated_hours, 0.0);

        let build = day.tasks.iter().find(|t| t.task_type == TaskType::BuildBase).unwrap();
        assert_eq!(build.quantity, 5);
        assert_eq!(build.estimated_hours, 4.0);
        assert_eq!(day.available_hours, 0.0);
    }

    // Scenario E — non-deadline work fills Friday's leftover slack once
    // Phase 2 has already locked the day's focus mode to Trim. Exercised at
    // the `pack_day` level directly: reproducing "2h left, mode Trim" through
    // the full deadline/non-deadline pipeline would require rigging two
    // independent chains to leave that exact residual, which is brittle
    // compared to asserting the invariant pack_day itself is responsible for.
    #[test]
    fn scenario_e_non_deadline_fills_leftover_slack() {
        let friday = NaiveDate::from_ymd_opt(2025, 10, 24).unwrap();
        let horizon_start = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        let horizon_end = NaiveDate::from_ymd_opt(2025, 10, 25).unwrap();
        let mut day = DaySchedule::empty(friday, 2.0);
        day.mode = Some(StepKey::Trim);
        let mut last_completion = HashMap::new();

        let tasks = vec![TaskChainItem {
            task_type: TaskType::Trim,
            piece_type: PieceType::MugWithHandle,
            order_detail_id: "slack".into(),
            order_detail_step_key: StepKey::Trim,
            quantity: 7,
            start_date: friday,
        }];

        let residual = pack_day(&mut day, tasks, horizon_start, horizon_end, &mut last_completion);
        assert!(residual.is_empty());
        assert_eq!(day.tasks.len(), 1);
        assert_eq!(day.tasks[0].quantity, 7);
        assert!((day.tasks[0].estimated_hours - 1.8667).abs() < 0.001);
        assert!((day.available_hours - 0.1333).abs() < 0.001);
    }

    // Scenario F — drying gate blocks planning for the current run.
    #[test]
    fn scenario_f_drying_gate_blocks_detail() {
        let due = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();
        let now = NaiveDate::from_ymd_opt(2025, 10, 19).unwrap();
        let mut d = detail("d1", PieceType::MugWithHandle, 5, StepKey::Attach);
        d.status_changed_at = Some(now - chrono::Duration::days(1));
        let mut store = MemoryStore::with_orders(vec![order("o1", Some(due), vec![d])]);
        run(&mut store, now).unwrap();

        let tasks = store.all_tasks();
        assert!(tasks.iter().all(|t| t.order_detail_id != "d1"));
    }
}
