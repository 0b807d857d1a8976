use chrono::NaiveDate;
use kilnsched_core::{AvailabilityUpdate, Order, SchedulerResult, TaskRecord};

/// The persistence contract the scheduler consumes. Implementations serve
/// two priority tiers of open orders, the pending-task lifecycle (purge then
/// bulk insert), and the availability override table.
///
/// `&mut self` throughout: a `SqliteStore` holds a single `rusqlite::Connection`
/// and `Dispatcher::run` is documented as single-invocation, so there's no
/// need for interior mutability or `Send + Sync` bounds here.
pub trait SchedulerStore {
    /// Orders with a non-null due date and a non-terminal status, ordered by
    /// due date ascending.
    fn list_open_orders_with_deadlines(&mut self) -> SchedulerResult<Vec<Order>>;

    /// Orders with no due date and a non-terminal status, ordered by
    /// creation date ascending.
    fn list_open_orders_without_deadlines(&mut self) -> SchedulerResult<Vec<Order>>;

    /// Removes every task record still in the `Pending` state. In-flight
    /// (non-pending) tasks are left untouched.
    fn delete_pending_tasks(&mut self) -> SchedulerResult<()>;

    /// Writes a batch of freshly planned task records, all starting life as
    /// `Pending`.
    fn insert_tasks(&mut self, tasks: &[TaskRecord]) -> SchedulerResult<()>;

    /// Purges pending tasks and inserts the freshly planned batch as one
    /// logical transaction, so a racing second run can't purge between this
    /// run's delete and insert. Backends without transactional guarantees may
    /// fall back to calling `delete_pending_tasks` then `insert_tasks` in
    /// sequence.
    fn purge_and_insert(&mut self, tasks: &[TaskRecord]) -> SchedulerResult<()> {
        self.delete_pending_tasks()?;
        self.insert_tasks(tasks)
    }

    /// Persisted availability overrides in `[start, end]`. Dates with no
    /// override are simply absent — callers fall back to the weekday default.
    fn get_availability(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SchedulerResult<Vec<AvailabilityUpdate>>;

    /// Upserts overrides keyed by date, returning the stored rows.
    fn upsert_availability(
        &mut self,
        items: &[AvailabilityUpdate],
    ) -> SchedulerResult<Vec<AvailabilityUpdate>>;
}
