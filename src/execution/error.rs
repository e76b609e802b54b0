//! Execution Errors
//!
//! Every error here is terminal for the run that raised it. The engine
//! never retries; callers decide whether to run the workflow again.

use std::fmt;

use thiserror::Error;

use crate::workflow::RunState;

/// Why a run stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("workflow not found: {0}")]
    WorkflowNotFound(String),

    #[error("workflow '{0}' has no steps")]
    EmptyWorkflow(String),

    #[error("failed to execute step {step}: step not found: {next}")]
    StepNotFound { step: String, next: String },

    #[error("failed to execute step {step}: task not found: {task}")]
    TaskNotFound { step: String, task: String },

    #[error("failed to execute step {step}: {message}")]
    TaskExecution { step: String, message: String },
}

/// Discriminant of [`ExecutionError`] for callers that branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    WorkflowNotFound,
    EmptyWorkflow,
    StepNotFound,
    TaskNotFound,
    TaskExecution,
}

impl ExecutionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WorkflowNotFound(_) => ErrorKind::WorkflowNotFound,
            Self::EmptyWorkflow(_) => ErrorKind::EmptyWorkflow,
            Self::StepNotFound { .. } => ErrorKind::StepNotFound,
            Self::TaskNotFound { .. } => ErrorKind::TaskNotFound,
            Self::TaskExecution { .. } => ErrorKind::TaskExecution,
        }
    }

    /// Step that was active when the error occurred.
    pub fn step(&self) -> Option<&str> {
        match self {
            Self::StepNotFound { step, .. }
            | Self::TaskNotFound { step, .. }
            | Self::TaskExecution { step, .. } => Some(step),
            Self::WorkflowNotFound(_) | Self::EmptyWorkflow(_) => None,
        }
    }
}

/// A failed run: the error plus whatever state the run got to.
///
/// `state` is `None` only for [`ExecutionError::WorkflowNotFound`], where
/// no run was started.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RunFailure {
    pub error: ExecutionError,
    pub state: Option<Box<RunState>>,
}

impl RunFailure {
    pub fn new(error: ExecutionError, state: RunState) -> Self {
        Self {
            error,
            state: Some(Box::new(state)),
        }
    }

    pub fn without_state(error: ExecutionError) -> Self {
        Self { error, state: None }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Partial state of the failed run.
    pub fn state(&self) -> Option<&RunState> {
        self.state.as_deref()
    }

    pub fn into_state(self) -> Option<RunState> {
        self.state.map(|state| *state)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::WorkflowNotFound => "WorkflowNotFound",
            ErrorKind::EmptyWorkflow => "EmptyWorkflow",
            ErrorKind::StepNotFound => "StepNotFound",
            ErrorKind::TaskNotFound => "TaskNotFound",
            ErrorKind::TaskExecution => "TaskExecutionError",
        };
        f.write_str(name)
    }
}
