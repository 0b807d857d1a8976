//! Static per-piece-type production processes.
//!
//! Rates are pieces per shift (a shift is 4 hours); a rate of `0` marks an
//! external process (the piece sits in a kiln, consuming no labour). Two
//! piece types — `Dinnerware` and `Other` — are valid enum members with no
//! catalogue entry: they round-trip through (de)serialization but have no
//! production process, so `process_for` rejects them the same way it
//! rejects any other lookup miss.

use kilnsched_core::{PieceType, ProductionStep, SchedulerError, SchedulerResult, StepKey, TaskType};

const MUG_WITH_HANDLE: &[ProductionStep] = &[
    ProductionStep::new(StepKey::Build, TaskType::BuildBase, 5.0, 2),
    ProductionStep::new(StepKey::Trim, TaskType::Trim, 15.0, 1),
    ProductionStep::new(StepKey::Attach, TaskType::AttachHandle, 8.0, 2),
    ProductionStep::new(StepKey::TrimFinal, TaskType::Trim, 15.0, 3),
    ProductionStep::new(StepKey::Bisque, TaskType::Bisque, 0.0, 5),
    ProductionStep::new(StepKey::Glaze, TaskType::Glaze, 17.0, 0),
    ProductionStep::new(StepKey::Fire, TaskType::Fire, 0.0, 5),
];

const MUG_WITHOUT_HANDLE: &[ProductionStep] = &[
    ProductionStep::new(StepKey::Build, TaskType::BuildBase, 5.0, 2),
    ProductionStep::new(StepKey::Trim, TaskType::Trim, 15.0, 1),
    ProductionStep::new(StepKey::Bisque, TaskType::Bisque, 0.0, 5),
    ProductionStep::new(StepKey::Glaze, TaskType::Glaze, 17.0, 0),
    ProductionStep::new(StepKey::Fire, TaskType::Fire, 0.0, 5),
];

const TUMBLER: &[ProductionStep] = &[
    ProductionStep::new(StepKey::Build, TaskType::BuildBase, 5.0, 2),
    ProductionStep::new(StepKey::Trim, TaskType::Trim, 15.0, 1),
    ProductionStep::new(StepKey::Attach, TaskType::AttachLid, 10.0, 2),
    ProductionStep::new(StepKey::TrimFinal, TaskType::Trim, 15.0, 3),
    ProductionStep::new(StepKey::Bisque, TaskType::Bisque, 0.0, 5),
    ProductionStep::new(StepKey::Glaze, TaskType::Glaze, 17.0, 0),
    ProductionStep::new(StepKey::Fire, TaskType::Fire, 0.0, 5),
];

const MATCHA_BOWL: &[ProductionStep] = &[
    ProductionStep::new(StepKey::Build, TaskType::BuildBowl, 3.0, 3),
    ProductionStep::new(StepKey::Trim, TaskType::Trim, 8.0, 3),
    ProductionStep::new(StepKey::Bisque, TaskType::Bisque, 0.0, 5),
    ProductionStep::new(StepKey::Glaze, TaskType::Glaze, 17.0, 0),
    ProductionStep::new(StepKey::Fire, TaskType::Fire, 0.0, 5),
];

const TRINKET_DISH: &[ProductionStep] = &[
    ProductionStep::new(StepKey::Build, TaskType::BuildBase, 30.0, 2),
    ProductionStep::new(StepKey::Trim, TaskType::Trim, 120.0, 3),
    ProductionStep::new(StepKey::Bisque, TaskType::Bisque, 0.0, 5),
    ProductionStep::new(StepKey::Glaze, TaskType::Glaze, 50.0, 0),
    ProductionStep::new(StepKey::Fire, TaskType::Fire, 0.0, 0),
];

/// Looks up the ordered production process for a piece type.
pub fn process_for(piece_type: PieceType) -> SchedulerResult<&'static [ProductionStep]> {
    match piece_type {
        PieceType::MugWithHandle => Ok(MUG_WITH_HANDLE),
        PieceType::MugWithoutHandle => Ok(MUG_WITHOUT_HANDLE),
        PieceType::Tumbler => Ok(TUMBLER),
        PieceType::MatchaBowl => Ok(MATCHA_BOWL),
        PieceType::TrinketDish => Ok(TRINKET_DISH),
        other => Err(SchedulerError::InvalidPieceType(other.to_string())),
    }
}

/// Finds a step by its task type within a piece type's process.
///
/// `Trim` occurs twice in some processes (`Trim` and `TrimFinal`, with
/// different drying days), so this returns whichever comes first — callers
/// that need to tell the two apart must use `step_for_key` instead.
pub fn step_for_task(
    piece_type: PieceType,
    task_type: TaskType,
) -> SchedulerResult<&'static ProductionStep> {
    process_for(piece_type)?
        .iter()
        .find(|step| step.task_type == task_type)
        .ok_or_else(|| SchedulerError::InvalidStepKey(task_type.to_string()))
}

/// Finds a step by its step key within a piece type's process. Unlike
/// `step_for_task`, this disambiguates `Trim` from `TrimFinal`.
pub fn step_for_key(
    piece_type: PieceType,
    step_key: StepKey,
) -> SchedulerResult<&'static ProductionStep> {
    process_for(piece_type)?
        .iter()
        .find(|step| step.step_key == step_key)
        .ok_or_else(|| SchedulerError::InvalidStepKey(step_key.to_string()))
}
