use std::str::FromStr;

use chrono::NaiveDate;
use kilnsched_core::{Order, OrderDetail, OrderStatus, PieceType, StepKey, TaskType};
use rusqlite::Row;

use crate::error::StoreError;

fn parse_date(s: &str, field: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| StoreError::Row(format!("invalid {field} ({s}): {e}")))
}

pub(super) fn build_order(
    id: String,
    customer_id: String,
    due_date: Option<String>,
    timeline: Option<String>,
    status: String,
    details: Vec<OrderDetail>,
) -> Result<Order, StoreError> {
    Ok(Order {
        id,
        customer_id,
        due_date: due_date.map(|d| parse_date(&d, "due_date")).transpose()?,
        timeline: timeline.map(|d| parse_date(&d, "timeline")).transpose()?,
        status: OrderStatus::from_str(&status).map_err(|e| StoreError::Row(e.to_string()))?,
        details,
    })
}

pub(super) fn detail_from_row(row: &Row<'_>) -> Result<OrderDetail, StoreError> {
    let piece_type: String = row.get("piece_type").map_err(StoreError::Sqlite)?;
    let current_step_key: String = row.get("current_step_key").map_err(StoreError::Sqlite)?;
    let status_changed_at: Option<String> =
        row.get("status_changed_at").map_err(StoreError::Sqlite)?;

    Ok(OrderDetail {
        id: row.get("id").map_err(StoreError::Sqlite)?,
        order_id: row.get("order_id").map_err(StoreError::Sqlite)?,
        piece_type: PieceType::from_str(&piece_type).map_err(|e| StoreError::Row(e.to_string()))?,
        quantity: row.get("quantity").map_err(StoreError::Sqlite)?,
        completed_quantity: row.get("completed_quantity").map_err(StoreError::Sqlite)?,
        current_step_key: StepKey::from_str(&current_step_key)
            .map_err(|e| StoreError::Row(e.to_string()))?,
        status_changed_at: status_changed_at
            .map(|d| parse_date(&d, "status_changed_at"))
            .transpose()?,
    })
}

pub(super) fn task_type_to_str(task_type: TaskType) -> &'static str {
    task_type.as_str()
}
