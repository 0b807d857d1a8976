//! # kilnsched-solver
//!
//! The scheduling algorithms themselves: the per-piece-type process
//! catalogue, the hours/quantity estimator, forward completion-date
//! projection, backward task-chain construction, availability lookups, and
//! the dispatcher that packs chains into a planning horizon.
//!
//! `kilnsched-core` supplies the vocabulary; `kilnsched-store` supplies
//! persistence. This crate is where the actual scheduling decisions get
//! made.

mod availability;
mod catalogue;
mod completion_date;
mod dispatcher;
mod estimator;
mod task_chain;

pub use availability::AvailabilityService;
pub use catalogue::{process_for, step_for_key, step_for_task};
pub use completion_date::{calc as completion_date_for, MINIMUM_PRODUCTION_DAYS};
pub use dispatcher::{horizon_for, run};
pub use estimator::{hours_for, quantity_for, SHIFT_HOURS};
pub use task_chain::{calc as task_chain_for, BUFFER_DAYS};
