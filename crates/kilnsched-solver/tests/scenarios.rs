//! End-to-end behavioural tests driving `kilnsched_solver::run` against a
//! `MemoryStore`, one per seeded scenario. Unlike the unit tests colocated
//! with `dispatcher.rs`, these exercise only the crates' public surface.

use chrono::NaiveDate;
use kilnsched_core::{Order, OrderDetail, OrderStatus, PieceType, StepKey, TaskType};
use kilnsched_solver::run;
use kilnsched_store::MemoryStore;

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

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn zero_out(store: &mut MemoryStore, dates: &[NaiveDate]) {
    let overrides = dates
        .iter()
        .map(|&d| kilnsched_core::AvailabilityUpdate {
            date: d,
            available_hours: 0.0,
            notes: None,
        })
        .collect();
    store.seed_availability(overrides);
}

// Scenario A — a small deadline order fits in one Monday.
#[test]
fn scenario_a_small_deadline_order_fits_monday() {
    let now = date(2025, 10, 19);
    let due = date(2025, 11, 15);
    let mut store = MemoryStore::with_orders(vec![order(
        "o1",
        Some(due),
        vec![detail("d1", PieceType::MugWithHandle, 5, StepKey::Pending)],
    )]);
    run(&mut store, now).unwrap();

    let tasks = store.all_tasks();
    let monday = date(2025, 10, 20);
    let on_monday: Vec<_> = tasks.iter().filter(|t| t.date == monday).collect();
    assert_eq!(on_monday.len(), 1);
    assert_eq!(on_monday[0].task_type, TaskType::BuildBase);
    assert_eq!(on_monday[0].quantity, 5);
    assert_eq!(on_monday[0].estimated_hours, 4.0);
    assert!(!on_monday[0].is_late);
}

// Scenario B — quantity split across two days by capacity; the focus-mode
// lock means leftover pieces don't spill onto a later day at the same step.
#[test]
fn scenario_b_quantity_splits_across_days() {
    let now = date(2025, 10, 19);
    let due = date(2025, 11, 17);
    let mut store = MemoryStore::with_orders(vec![order(
        "o1",
        Some(due),
        vec![detail("d1", PieceType::MugWithHandle, 10, StepKey::Pending)],
    )]);
    zero_out(
        &mut store,
        &[date(2025, 10, 22), date(2025, 10, 23), date(2025, 10, 24), date(2025, 10, 25)],
    );
    run(&mut store, now).unwrap();

    let tasks = store.all_tasks();
    let monday = date(2025, 10, 20);
    let tuesday = date(2025, 10, 21);
    let mon: Vec<_> = tasks.iter().filter(|t| t.date == monday).collect();
    let tue: Vec<_> = tasks.iter().filter(|t| t.date == tuesday).collect();

    assert_eq!(mon.len(), 1);
    assert_eq!(mon[0].quantity, 5);
    assert_eq!(mon[0].estimated_hours, 4.0);
    assert_eq!(tue.len(), 1);
    assert_eq!(tue[0].quantity, 2);
    assert_eq!(tue[0].estimated_hours, 1.6);
    assert_eq!(tasks.len(), 2, "the remaining 3 mugs had no capacity left this week");
}

// Scenario C — an external process shares a work day with a labour task.
// Both details belong to one order so they share a due date; Monday-Wednesday
// are zeroed so both chains wait for the same open Thursday.
#[test]
fn scenario_c_external_process_shares_work_day() {
    let now = date(2025, 10, 19);
    let due = date(2025, 11, 7);
    let mut bisque_bound = detail("a", PieceType::MugWithHandle, 20, StepKey::TrimFinal);
    bisque_bound.status_changed_at = Some(now - chrono::Duration::days(4));
    let build_bound = detail("b", PieceType::MugWithHandle, 5, StepKey::Pending);

    let mut store =
        MemoryStore::with_orders(vec![order("o1", Some(due), vec![bisque_bound, build_bound])]);
    zero_out(&mut store, &[date(2025, 10, 20), date(2025, 10, 21), date(2025, 10, 22)]);
    run(&mut store, now).unwrap();

    let thursday = date(2025, 10, 23);
    let on_thursday: Vec<_> = store.all_tasks().into_iter().filter(|t| t.date == thursday).collect();
    assert_eq!(on_thursday.len(), 2);

    let bisque = on_thursday.iter().find(|t| t.task_type == TaskType::Bisque).unwrap();
    assert_eq!(bisque.quantity, 20);
    assert_eq!(bisque.estimated_hours, 0.0);

    let build = on_thursday.iter().find(|t| t.task_type == TaskType::BuildBase).unwrap();
    assert_eq!(build.quantity, 5);
    assert_eq!(build.estimated_hours, 4.0);
}

// Scenario D — a heavily overdue chain places its first task immediately,
// then gates the next task on the detail's lastCompletion date rather than
// that task's own (also overdue) startDate.
#[test]
fn scenario_d_late_task_inherits_drying_gap() {
    let now = date(2025, 10, 19);
    let due = date(2025, 10, 21); // so far behind that every chain step is already overdue.
    let mut store = MemoryStore::with_orders(vec![order(
        "o1",
        Some(due),
        vec![detail("d1", PieceType::MugWithHandle, 5, StepKey::Pending)],
    )]);
    run(&mut store, now).unwrap();

    let tasks = store.all_tasks();
    let monday = date(2025, 10, 20);
    let on_monday: Vec<_> = tasks.iter().filter(|t| t.date == monday).collect();
    assert_eq!(on_monday.len(), 1);
    assert_eq!(on_monday[0].task_type, TaskType::BuildBase);
    assert!(on_monday[0].is_late, "the backdated chain start makes every task late");

    // Trim's own chain start_date is weeks before `now`; it must not appear
    // until lastCompletion clears, on the Thursday after Build's drying.
    let tuesday = date(2025, 10, 21);
    let wednesday = date(2025, 10, 22);
    let thursday = date(2025, 10, 23);
    assert!(tasks.iter().all(|t| !(t.date == tuesday && t.task_type == TaskType::Trim)));
    assert!(tasks.iter().all(|t| !(t.date == wednesday && t.task_type == TaskType::Trim)));
    let trim_day: Vec<_> = tasks.iter().filter(|t| t.task_type == TaskType::Trim).collect();
    assert_eq!(trim_day.len(), 1);
    assert_eq!(trim_day[0].date, thursday);
}

// Scenario F — drying gate blocks planning for the current run.
#[test]
fn scenario_f_drying_gate_blocks_detail() {
    let now = date(2025, 10, 19);
    let due = date(2025, 11, 28);
    let mut d = detail("d1", PieceType::MugWithHandle, 5, StepKey::Attach);
    d.status_changed_at = Some(now - chrono::Duration::days(1));
    let mut store = MemoryStore::with_orders(vec![order("o1", Some(due), vec![d])]);
    run(&mut store, now).unwrap();

    assert!(store.all_tasks().iter().all(|t| t.order_detail_id != "d1"));
}
