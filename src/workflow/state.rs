//! Run State
//!
//! The mutable record of one workflow execution: which step is active,
//! which steps finished, what each executed step returned, and the
//! overall status of the run.
//!
//! Run state lives in memory only. The engine keeps the most recent
//! state per workflow name for later inspection.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result payload produced by a task: field name to any JSON value.
pub type TaskOutput = Map<String, Value>;

/// Overall status of a run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    /// Returns true for `Completed` and `Failed`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunStatus::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one executed step.
///
/// `data` is present only on success, `error` only on failure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StepResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TaskOutput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepResult {
    pub fn succeeded(data: TaskOutput) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Looks up a field in the result data.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|data| data.get(name))
    }
}

/// State of a single workflow run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunState {
    /// Name of the workflow being run
    pub workflow_name: String,

    /// ID of the step the engine is on (or stopped at)
    pub current_step: String,

    /// Steps whose task ran and succeeded, in visit order
    pub completed_steps: Vec<String>,

    /// One entry per executed step
    pub step_results: HashMap<String, StepResult>,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub start_time: DateTime<Utc>,

    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,

    pub status: RunStatus,
}

impl RunState {
    /// Creates a fresh running state stamped with the current time.
    pub fn new(workflow_name: impl Into<String>) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            current_step: String::new(),
            completed_steps: Vec::new(),
            step_results: HashMap::new(),
            start_time: Utc::now(),
            end_time: None,
            status: RunStatus::Running,
        }
    }

    /// Records a successful step and appends it to the completed list.
    pub fn record_success(&mut self, step_id: &str, data: TaskOutput) {
        self.step_results
            .insert(step_id.to_string(), StepResult::succeeded(data));
        self.completed_steps.push(step_id.to_string());
    }

    /// Records a failed step. Failed steps never count as completed.
    pub fn record_failure(&mut self, step_id: &str, error: impl Into<String>) {
        self.step_results
            .insert(step_id.to_string(), StepResult::failed(error));
    }

    /// Moves the run into a terminal status and stamps the end time.
    ///
    /// Only the first terminal transition takes effect.
    pub fn finish(&mut self, status: RunStatus) {
        if self.status.is_terminal() || !status.is_terminal() {
            return;
        }
        self.status = status;
        self.end_time = Some(Utc::now());
    }

    /// Returns the recorded result of a step, if it ran.
    pub fn result(&self, step_id: &str) -> Option<&StepResult> {
        self.step_results.get(step_id)
    }

    /// Returns true if the step ran and succeeded.
    pub fn step_succeeded(&self, step_id: &str) -> bool {
        self.result(step_id).is_some_and(|r| r.success)
    }

    /// Returns true once the run reached `Completed` or `Failed`.
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Wall-clock duration of a finished run.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}
