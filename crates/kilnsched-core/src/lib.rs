//! # kilnsched-core
//!
//! Domain model and error types shared by the kiln production scheduler.
//!
//! This crate provides:
//! - Domain types: `Order`, `OrderDetail`, `ProductionStep`, `TaskChainItem`,
//!   `TaskRecord`, `DaySchedule`, `AvailabilityEntry`
//! - The closed enumerations `PieceType`, `StepKey`, `TaskType`
//! - `SchedulerError` and the crate-wide `SchedulerResult` alias
//!
//! Scheduling logic itself (the process catalogue, estimator, task chain
//! planner and dispatcher) lives in `kilnsched-solver`; persistence
//! implementations live in `kilnsched-store`. This crate is the shared
//! vocabulary both depend on.

mod error;
mod model;

pub use error::{SchedulerError, SchedulerResult};
pub use model::{
    default_hours_for_weekday, AvailabilityEntry, AvailabilityUpdate, DaySchedule, Order,
    OrderDetail, OrderDetailId, OrderId, OrderStatus, PieceType, ProductionStep, StepKey,
    TaskChainItem, TaskRecord, TaskType,
};
