use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// Unique identifier for an order.
pub type OrderId = String;

/// Unique identifier for an order detail (line item).
pub type OrderDetailId = String;

// ============================================================================
// Piece type
// ============================================================================

/// A product category whose fabrication follows a fixed production process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PieceType {
    MugWithHandle,
    MugWithoutHandle,
    Tumbler,
    MatchaBowl,
    TrinketDish,
    Dinnerware,
    Other,
}

impl PieceType {
    pub const ALL: [PieceType; 7] = [
        PieceType::MugWithHandle,
        PieceType::MugWithoutHandle,
        PieceType::Tumbler,
        PieceType::MatchaBowl,
        PieceType::TrinketDish,
        PieceType::Dinnerware,
        PieceType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceType::MugWithHandle => "MugWithHandle",
            PieceType::MugWithoutHandle => "MugWithoutHandle",
            PieceType::Tumbler => "Tumbler",
            PieceType::MatchaBowl => "MatchaBowl",
            PieceType::TrinketDish => "TrinketDish",
            PieceType::Dinnerware => "Dinnerware",
            PieceType::Other => "Other",
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieceType {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MugWithHandle" => Ok(PieceType::MugWithHandle),
            "MugWithoutHandle" => Ok(PieceType::MugWithoutHandle),
            "Tumbler" => Ok(PieceType::Tumbler),
            "MatchaBowl" => Ok(PieceType::MatchaBowl),
            "TrinketDish" => Ok(PieceType::TrinketDish),
            "Dinnerware" => Ok(PieceType::Dinnerware),
            "Other" => Ok(PieceType::Other),
            other => Err(SchedulerError::InvalidPieceType(other.to_string())),
        }
    }
}

// ============================================================================
// Step key
// ============================================================================

/// The order detail's current position within its piece type's production
/// process. Unique within any single process — see the catalogue module for
/// why `MugWithHandle` needs a distinct `TrimFinal` rather than reusing `Trim`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum StepKey {
    Pending,
    Build,
    Trim,
    Attach,
    TrimFinal,
    Bisque,
    Glaze,
    Fire,
}

impl StepKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKey::Pending => "Pending",
            StepKey::Build => "Build",
            StepKey::Trim => "Trim",
            StepKey::Attach => "Attach",
            StepKey::TrimFinal => "TrimFinal",
            StepKey::Bisque => "Bisque",
            StepKey::Glaze => "Glaze",
            StepKey::Fire => "Fire",
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKey {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(StepKey::Pending),
            "Build" => Ok(StepKey::Build),
            "Trim" => Ok(StepKey::Trim),
            "Attach" => Ok(StepKey::Attach),
            "TrimFinal" => Ok(StepKey::TrimFinal),
            "Bisque" => Ok(StepKey::Bisque),
            "Glaze" => Ok(StepKey::Glaze),
            "Fire" => Ok(StepKey::Fire),
            other => Err(SchedulerError::InvalidStepKey(other.to_string())),
        }
    }
}

// ============================================================================
// Task type
// ============================================================================

/// The concrete unit of work a task record represents. Distinct from
/// `StepKey`: several task types can share a step key across different piece
/// types (e.g. `BuildBase` and `BuildBowl` both occupy the `Build` step).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TaskType {
    BuildBase,
    BuildBowl,
    Trim,
    AttachHandle,
    AttachLid,
    Bisque,
    Glaze,
    Fire,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::BuildBase => "BuildBase",
            TaskType::BuildBowl => "BuildBowl",
            TaskType::Trim => "Trim",
            TaskType::AttachHandle => "AttachHandle",
            TaskType::AttachLid => "AttachLid",
            TaskType::Bisque => "Bisque",
            TaskType::Glaze => "Glaze",
            TaskType::Fire => "Fire",
        }
    }

    /// External processes (kiln firing) consume wall-clock time but no
    /// labour hours and never set a day's focus mode.
    pub fn is_external(&self) -> bool {
        matches!(self, TaskType::Bisque | TaskType::Fire)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Production step
// ============================================================================

/// One stage within a piece type's production process.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionStep {
    pub step_key: StepKey,
    pub task_type: TaskType,
    /// Pieces per shift. Zero denotes an external process.
    pub rate: f64,
    /// Whole days that must elapse between this step ending and the next
    /// one starting.
    pub drying_days: i64,
}

impl ProductionStep {
    pub const fn new(step_key: StepKey, task_type: TaskType, rate: f64, drying_days: i64) -> Self {
        Self {
            step_key,
            task_type,
            rate,
            drying_days,
        }
    }

    pub fn is_external(&self) -> bool {
        self.rate == 0.0
    }
}

// ============================================================================
// Order / order detail
// ============================================================================

/// Terminal statuses exclude an order from both scheduling phases. Anything
/// else is treated as open.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Delivered,
    Cancelled,
    Completed,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Completed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "in_progress" => Ok(OrderStatus::InProgress),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(SchedulerError::Validation(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: OrderDetailId,
    pub order_id: OrderId,
    pub piece_type: PieceType,
    pub quantity: u32,
    pub completed_quantity: u32,
    pub current_step_key: StepKey,
    pub status_changed_at: Option<NaiveDate>,
}

impl OrderDetail {
    /// Pieces still outstanding at the current step.
    pub fn remaining_quantity(&self) -> u32 {
        self.quantity.saturating_sub(self.completed_quantity)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: String,
    pub due_date: Option<NaiveDate>,
    pub timeline: Option<NaiveDate>,
    pub status: OrderStatus,
    pub details: Vec<OrderDetail>,
}

impl Order {
    pub fn is_deadline(&self) -> bool {
        self.due_date.is_some()
    }
}

// ============================================================================
// Planner-internal / dispatcher-internal types
// ============================================================================

/// One entry of a task chain: the earliest date a unit of work may start.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskChainItem {
    pub task_type: TaskType,
    pub piece_type: PieceType,
    pub order_detail_id: OrderDetailId,
    pub order_detail_step_key: StepKey,
    pub quantity: u32,
    pub start_date: NaiveDate,
}

/// A dispatcher-emitted, persisted unit of work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub order_detail_id: OrderDetailId,
    pub date: NaiveDate,
    pub task_type: TaskType,
    pub quantity: u32,
    pub estimated_hours: f64,
    pub is_late: bool,
}

/// Per-horizon-date dispatcher bookkeeping: the day's focus, its residual
/// capacity, and the tasks placed on it so far.
#[derive(Clone, Debug)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub mode: Option<StepKey>,
    pub available_hours: f64,
    pub tasks: Vec<TaskRecord>,
}

impl DaySchedule {
    pub fn empty(date: NaiveDate, available_hours: f64) -> Self {
        Self {
            date,
            weekday: date.weekday(),
            mode: None,
            available_hours,
            tasks: Vec::new(),
        }
    }
}

/// A single date's labour-hour allowance, whether an explicit override or a
/// weekday-default fallback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub date: NaiveDate,
    pub available_hours: f64,
    pub notes: Option<String>,
    pub is_default: bool,
}

/// An availability override submitted through the CRUD collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub date: NaiveDate,
    pub available_hours: f64,
    pub notes: Option<String>,
}

/// Mon 4, Tue 2, Wed 2, Thu 4, Fri 8, Sat 8, Sun 0 — the fallback used
/// whenever a date has no persisted override.
pub fn default_hours_for_weekday(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Mon => 4.0,
        Weekday::Tue => 2.0,
        Weekday::Wed => 2.0,
        Weekday::Thu => 4.0,
        Weekday::Fri => 8.0,
        Weekday::Sat => 8.0,
        Weekday::Sun => 0.0,
    }
}
