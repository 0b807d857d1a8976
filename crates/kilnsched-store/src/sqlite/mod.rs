//! `rusqlite`-backed `SchedulerStore`.
//!
//! Connection-open, schema-init and typed-row-mapping follow the same shape
//! as the rest of the pack's sqlite-backed stores: one file opens and owns
//! the connection, a `rows` submodule carries the row <-> domain conversions.

mod rows;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use kilnsched_core::{AvailabilityUpdate, Order, OrderDetail, SchedulerResult, TaskRecord};
use rusqlite::{params, Connection, Transaction};

use crate::error::StoreError;
use crate::store::SchedulerStore;

const SCHEMA: &str = include_str!("schema.sql");

fn insert_tasks_tx(tx: &Transaction<'_>, tasks: &[TaskRecord]) -> rusqlite::Result<()> {
    for task in tasks {
        tx.execute(
            "INSERT INTO tasks (order_detail_id, date, task_type, quantity, \
             estimated_hours, is_late, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending')",
            params![
                task.order_detail_id,
                task.date.format("%Y-%m-%d").to_string(),
                rows::task_type_to_str(task.task_type),
                task.quantity,
                task.estimated_hours,
                task.is_late,
            ],
        )?;
    }
    Ok(())
}

/// A `SchedulerStore` backed by a single sqlite file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if necessary) the database at `db_path` and applies
    /// the embedded schema.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path: PathBuf = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Row(format!(
                        "error creating directory ({}): {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        let conn = Connection::open(&db_path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Opens an in-memory sqlite database, for integration tests that want
    /// the real SQL path without a file on disk.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn fetch_details(&self, order_id: &str) -> Result<Vec<OrderDetail>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, order_id, piece_type, quantity, completed_quantity, \
             current_step_key, status_changed_at FROM order_details \
             WHERE order_id = ?1",
        )?;
        let mut out = Vec::new();
        let mut result = stmt.query(params![order_id])?;
        while let Some(row) = result.next()? {
            out.push(rows::detail_from_row(row)?);
        }
        Ok(out)
    }

    fn fetch_orders(&self, where_clause: &str, order_by: &str) -> Result<Vec<Order>, StoreError> {
        let sql = format!(
            "SELECT id, customer_id, due_date, timeline, status FROM orders \
             WHERE {where_clause} ORDER BY {order_by}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut result = stmt.query([])?;

        let mut orders = Vec::new();
        while let Some(row) = result.next()? {
            let id: String = row.get("id")?;
            let customer_id: String = row.get("customer_id")?;
            let due_date: Option<String> = row.get("due_date")?;
            let timeline: Option<String> = row.get("timeline")?;
            let status: String = row.get("status")?;
            orders.push((id, customer_id, due_date, timeline, status));
        }

        orders
            .into_iter()
            .map(|(id, customer_id, due_date, timeline, status)| {
                let details = self.fetch_details(&id)?;
                rows::build_order(id, customer_id, due_date, timeline, status, details)
            })
            .collect()
    }

}

impl SchedulerStore for SqliteStore {
    fn list_open_orders_with_deadlines(&mut self) -> SchedulerResult<Vec<Order>> {
        Ok(self.fetch_orders(
            "due_date IS NOT NULL AND status NOT IN ('delivered', 'cancelled', 'completed')",
            "due_date ASC",
        )?)
    }

    fn list_open_orders_without_deadlines(&mut self) -> SchedulerResult<Vec<Order>> {
        Ok(self.fetch_orders(
            "due_date IS NULL AND status NOT IN ('delivered', 'cancelled', 'completed')",
            "rowid ASC",
        )?)
    }

    fn delete_pending_tasks(&mut self) -> SchedulerResult<()> {
        self.conn
            .execute("DELETE FROM tasks WHERE status = 'pending'", [])
            .map_err(StoreError::from)?;
        Ok(())
    }

    fn insert_tasks(&mut self, tasks: &[TaskRecord]) -> SchedulerResult<()> {
        let tx = self.conn.transaction().map_err(StoreError::from)?;
        insert_tasks_tx(&tx, tasks).map_err(StoreError::from)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(())
    }

    fn purge_and_insert(&mut self, tasks: &[TaskRecord]) -> SchedulerResult<()> {
        let tx = self.conn.transaction().map_err(StoreError::from)?;
        tx.execute("DELETE FROM tasks WHERE status = 'pending'", [])
            .map_err(StoreError::from)?;
        insert_tasks_tx(&tx, tasks).map_err(StoreError::from)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(())
    }

    fn get_availability(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SchedulerResult<Vec<AvailabilityUpdate>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT date, available_hours, notes FROM availability \
                 WHERE date >= ?1 AND date <= ?2 ORDER BY date ASC",
            )
            .map_err(StoreError::from)?;
        let mut result = stmt
            .query(params![
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string()
            ])
            .map_err(StoreError::from)?;

        let mut out = Vec::new();
        while let Some(row) = result.next().map_err(StoreError::from)? {
            let date: String = row.get("date").map_err(StoreError::from)?;
            let available_hours: f64 = row.get("available_hours").map_err(StoreError::from)?;
            let notes: Option<String> = row.get("notes").map_err(StoreError::from)?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|e| StoreError::Row(format!("invalid availability date: {e}")))?;
            out.push(AvailabilityUpdate {
                date,
                available_hours,
                notes,
            });
        }
        Ok(out)
    }

    fn upsert_availability(
        &mut self,
        items: &[AvailabilityUpdate],
    ) -> SchedulerResult<Vec<AvailabilityUpdate>> {
        let tx = self.conn.transaction().map_err(StoreError::from)?;
        for item in items {
            tx.execute(
                "INSERT INTO availability (date, available_hours, notes) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(date) DO UPDATE SET \
                 available_hours = excluded.available_hours, notes = excluded.notes",
                params![
                    item.date.format("%Y-%m-%d").to_string(),
                    item.available_hours,
                    item.notes,
                ],
            )
            .map_err(StoreError::from)?;
        }
        tx.commit().map_err(StoreError::from)?;
        Ok(items.to_vec())
    }
}
