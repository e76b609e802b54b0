//! Individual Step Execution
//!
//! Handles one visit to a workflow step:
//! - Condition gate (skip when false)
//! - Task lookup in the catalog
//! - Task invocation with the step params and the live run state
//! - Recording the result in the run state

use log::{debug, error, info, warn};

use crate::monitoring::{EventType, ExecutionTimeline};
use crate::tasks::TaskCatalog;
use crate::workflow::{RunState, Step};

use super::condition::evaluate_condition;
use super::error::ExecutionError;

/// What happened when a step was visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Task ran and succeeded; result recorded, step marked completed.
    Completed,
    /// Condition was false; nothing recorded.
    Skipped,
}

/// Executes a single workflow step.
///
/// # Returns
///
/// * `Ok(StepOutcome)` - The step completed or was skipped
/// * `Err(TaskNotFound)` - The step's task is not in the catalog
/// * `Err(TaskExecution)` - The task failed; the failure is recorded in
///   `state` but the step is not marked completed
pub fn execute_step(
    step: &Step,
    catalog: &TaskCatalog,
    state: &mut RunState,
    timeline: &mut ExecutionTimeline,
) -> Result<StepOutcome, ExecutionError> {
    if let Some(condition) = step.active_condition() {
        if !evaluate_condition(condition, state) {
            warn!(
                "Skipping step '{}': condition '{}' not met",
                step.id, condition
            );
            timeline.add_event(step.id.as_str(), EventType::Skipped);
            return Ok(StepOutcome::Skipped);
        }
        debug!("Step '{}': condition '{}' met", step.id, condition);
    }

    let task = catalog
        .get(&step.task)
        .ok_or_else(|| ExecutionError::TaskNotFound {
            step: step.id.clone(),
            task: step.task.clone(),
        })?;

    info!("Starting step: {} (task: {})", step.id, step.task);
    debug!("Step '{}' params: {:?}", step.id, step.params);
    timeline.add_event(step.id.as_str(), EventType::Started);

    match task.execute(&step.params, state) {
        Ok(data) => {
            debug!("Step '{}' returned {} fields", step.id, data.len());
            state.record_success(&step.id, data);
            timeline.add_event(step.id.as_str(), EventType::Completed);
            info!("Step '{}' completed successfully", step.id);
            Ok(StepOutcome::Completed)
        }
        Err(e) => {
            let message = e.to_string();
            error!("Step '{}' failed: {}", step.id, message);
            state.record_failure(&step.id, message.clone());
            timeline.add_event(step.id.as_str(), EventType::Failed);
            Err(ExecutionError::TaskExecution {
                step: step.id.clone(),
                message,
            })
        }
    }
}
