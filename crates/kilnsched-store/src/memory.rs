use chrono::NaiveDate;
use kilnsched_core::{AvailabilityUpdate, Order, SchedulerResult, TaskRecord};

use crate::store::SchedulerStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TaskStatus {
    Pending,
    Completed,
}

#[derive(Clone, Debug)]
struct StoredTask {
    record: TaskRecord,
    status: TaskStatus,
}

/// An in-memory `SchedulerStore`, used by solver unit/scenario tests and by
/// the CLI's `check` subcommand, which never touches a real database.
#[derive(Default)]
pub struct MemoryStore {
    orders: Vec<Order>,
    tasks: Vec<StoredTask>,
    availability: Vec<AvailabilityUpdate>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders,
            tasks: Vec::new(),
            availability: Vec::new(),
        }
    }

    pub fn seed_availability(&mut self, items: Vec<AvailabilityUpdate>) {
        self.availability = items;
    }

    /// Marks a previously inserted task as completed, simulating the
    /// external task-completion collaborator. Exposed for tests that check
    /// Phase 0 leaves non-pending tasks alone.
    pub fn mark_completed(&mut self, order_detail_id: &str, date: NaiveDate) {
        for task in &mut self.tasks {
            if task.record.order_detail_id == order_detail_id && task.record.date == date {
                task.status = TaskStatus::Completed;
            }
        }
    }

    /// All tasks currently held, pending or completed, in insertion order.
    pub fn all_tasks(&self) -> Vec<TaskRecord> {
        self.tasks.iter().map(|t| t.record.clone()).collect()
    }
}

impl SchedulerStore for MemoryStore {
    fn list_open_orders_with_deadlines(&mut self) -> SchedulerResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.due_date.is_some() && !o.status.is_terminal())
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.due_date);
        Ok(orders)
    }

    fn list_open_orders_without_deadlines(&mut self) -> SchedulerResult<Vec<Order>> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.due_date.is_none() && !o.status.is_terminal())
            .cloned()
            .collect())
    }

    fn delete_pending_tasks(&mut self) -> SchedulerResult<()> {
        self.tasks.retain(|t| t.status != TaskStatus::Pending);
        Ok(())
    }

    fn insert_tasks(&mut self, tasks: &[TaskRecord]) -> SchedulerResult<()> {
        self.tasks.extend(tasks.iter().cloned().map(|record| StoredTask {
            record,
            status: TaskStatus::Pending,
        }));
        Ok(())
    }

    fn get_availability(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SchedulerResult<Vec<AvailabilityUpdate>> {
        Ok(self
            .availability
            .iter()
            .filter(|a| a.date >= start && a.date <= end)
            .cloned()
            .collect())
    }

    fn upsert_availability(
        &mut self,
        items: &[AvailabilityUpdate],
    ) -> SchedulerResult<Vec<AvailabilityUpdate>> {
        for item in items {
            if let Some(existing) = self.availability.iter_mut().find(|a| a.date == item.date) {
                *existing = item.clone();
            } else {
                self.availability.push(item.clone());
            }
        }
        Ok(items.to_vec())
    }
}
