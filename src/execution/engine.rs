//! Workflow Execution Engine
//!
//! The core engine that orchestrates workflow runs:
//! - Holds the task catalog and the loaded workflow definitions
//! - Drives the step-transition loop from the first step to the end
//! - Keeps the latest run state and timeline per workflow name
//!
//! Runs are strictly sequential. `run` takes `&mut self`, so a single
//! engine can only make progress on one run at a time. Callers that need
//! to share an engine across threads go through
//! [`SharedEngine`](super::shared::SharedEngine).

use std::collections::HashMap;
use std::path::Path;

use log::{debug, error, info};

use crate::monitoring::ExecutionTimeline;
use crate::tasks::{Task, TaskCatalog};
use crate::workflow::validator::{lint_workflow, warn_issues, LintIssue};
use crate::workflow::{load_workflow, LoadError, RunState, RunStatus, Step, Workflow};

use super::error::{ExecutionError, RunFailure};
use super::step::{execute_step, StepOutcome};

/// Workflow execution engine.
///
/// # Example
///
/// ```rust,no_run
/// use flowline::execution::Engine;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut engine = Engine::new();
///     engine.register_default_tasks();
///
///     let name = engine.load_file("order_process.json")?;
///     let state = engine.run(&name)?;
///     println!("{}: {}", name, state.status);
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    catalog: TaskCatalog,
    workflows: HashMap<String, Workflow>,
    states: HashMap<String, RunState>,
    timelines: HashMap<String, ExecutionTimeline>,
}

impl Engine {
    /// Creates an engine with an empty catalog and no workflows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task. A task with the same name is replaced.
    pub fn register_task(&mut self, task: impl Task + 'static) {
        self.catalog.register(task);
    }

    /// Registers the built-in sample tasks.
    pub fn register_default_tasks(&mut self) {
        self.catalog.register_defaults();
    }

    pub fn catalog(&self) -> &TaskCatalog {
        &self.catalog
    }

    /// Registered task names, in no particular order.
    pub fn task_names(&self) -> Vec<String> {
        self.catalog.list()
    }

    /// Stores a workflow definition, replacing one with the same name.
    ///
    /// Only the name is checked. Structural lint findings are logged as
    /// warnings and never block the load. Tasks may be registered after
    /// loading, so task names missing from the catalog are only logged at
    /// debug.
    pub fn load(&mut self, workflow: Workflow) -> Result<(), LoadError> {
        if workflow.name.trim().is_empty() {
            return Err(LoadError::MissingName);
        }

        warn_issues(&workflow, &load_issues(&workflow));
        for task in self.unregistered_tasks(&workflow) {
            debug!(
                "Workflow '{}': task '{}' is not registered yet",
                workflow.name, task
            );
        }

        info!(
            "Workflow loaded: '{}' ({} steps)",
            workflow.name,
            workflow.steps.len()
        );
        self.workflows.insert(workflow.name.clone(), workflow);
        Ok(())
    }

    /// Loads a workflow file and returns the workflow's name.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<String, LoadError> {
        let workflow = load_workflow(path)?;
        let name = workflow.name.clone();
        self.load(workflow)?;
        Ok(name)
    }

    /// Task names used by a workflow that the catalog does not hold.
    pub fn unregistered_tasks(&self, workflow: &Workflow) -> Vec<String> {
        workflow
            .task_names()
            .into_iter()
            .filter(|task| !task.trim().is_empty() && !self.catalog.contains(task))
            .collect()
    }

    pub fn workflow(&self, name: &str) -> Option<&Workflow> {
        self.workflows.get(name)
    }

    pub fn workflow_names(&self) -> Vec<String> {
        self.workflows.keys().cloned().collect()
    }

    /// Runs a loaded workflow by name.
    ///
    /// A fresh run state replaces any previous state kept for the same
    /// name. On failure the partial state is returned inside the
    /// [`RunFailure`] and is also kept for [`Engine::get_state`].
    ///
    /// # Returns
    ///
    /// * `Ok(RunState)` - The run completed
    /// * `Err(RunFailure)` - The workflow is unknown or the run failed
    pub fn run(&mut self, workflow_name: &str) -> Result<RunState, RunFailure> {
        let workflow = self.workflows.get(workflow_name).ok_or_else(|| {
            error!("Workflow not found: {}", workflow_name);
            RunFailure::without_state(ExecutionError::WorkflowNotFound(workflow_name.to_string()))
        })?;

        info!(
            "Running workflow '{}' ({} steps)",
            workflow_name,
            workflow.steps.len()
        );

        let mut state = RunState::new(workflow_name);
        let mut timeline = ExecutionTimeline::new();

        let result = run_steps(workflow, &self.catalog, &mut state, &mut timeline);

        match &result {
            Ok(()) => {
                state.finish(RunStatus::Completed);
                info!(
                    "Workflow '{}' completed ({} steps run)",
                    workflow_name,
                    state.completed_steps.len()
                );
            }
            Err(e) => {
                state.finish(RunStatus::Failed);
                error!("Workflow '{}' failed: {}", workflow_name, e);
            }
        }

        self.states
            .insert(workflow_name.to_string(), state.clone());
        self.timelines.insert(workflow_name.to_string(), timeline);

        match result {
            Ok(()) => Ok(state),
            Err(error) => Err(RunFailure::new(error, state)),
        }
    }

    /// Returns the state of the latest run of a workflow.
    pub fn get_state(&self, workflow_name: &str) -> Option<&RunState> {
        self.states.get(workflow_name)
    }

    /// Returns the timeline of the latest run of a workflow.
    pub fn timeline(&self, workflow_name: &str) -> Option<&ExecutionTimeline> {
        self.timelines.get(workflow_name)
    }
}

/// Lint findings reported when a workflow is loaded. The catalog is left
/// out because registration order is up to the caller.
fn load_issues(workflow: &Workflow) -> Vec<LintIssue> {
    lint_workflow(workflow, None)
}

/// The step-transition loop.
///
/// Starts at the first step, visits one step at a time, and stops when no
/// successor is resolved or a step fails.
fn run_steps(
    workflow: &Workflow,
    catalog: &TaskCatalog,
    state: &mut RunState,
    timeline: &mut ExecutionTimeline,
) -> Result<(), ExecutionError> {
    let mut current = workflow
        .start_step()
        .ok_or_else(|| ExecutionError::EmptyWorkflow(workflow.name.clone()))?;

    loop {
        state.current_step = current.id.clone();

        let outcome = execute_step(current, catalog, state, timeline)?;

        let Some(next_id) = next_step_id(current, outcome, state) else {
            debug!("Step '{}' has no successor, run finished", current.id);
            break;
        };

        current = workflow
            .get_step(next_id)
            .ok_or_else(|| ExecutionError::StepNotFound {
                step: current.id.clone(),
                next: next_id.to_string(),
            })?;

        debug!("Transition -> '{}'", current.id);
    }

    Ok(())
}

/// Resolves the id of the step to visit after `step`.
///
/// Only `next[0]` is ever followed. An executed step must also have a
/// successful recorded result; a skipped step follows its successor as is.
fn next_step_id<'a>(step: &'a Step, outcome: StepOutcome, state: &RunState) -> Option<&'a str> {
    let next = step.successor()?;

    if outcome == StepOutcome::Completed && !state.step_succeeded(&step.id) {
        return None;
    }

    if step.next.len() > 1 {
        debug!(
            "Step '{}': following '{}', ignoring {:?}",
            step.id,
            next,
            &step.next[1..]
        );
    }

    Some(next)
}
