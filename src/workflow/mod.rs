//! Workflow Definition Module
//!
//! Provides data structures and utilities for defining, loading, and
//! linting workflows, plus the run state recorded while one executes.
//!
//! # Structure
//!
//! - [`model`]: Workflow definition (Workflow, Step)
//! - [`state`]: Per-run record (RunState, StepResult, RunStatus)
//! - [`parser`]: JSON/YAML loading and saving
//! - [`validator`]: Non-blocking lint of definitions

pub mod model;
pub mod parser;
pub mod state;
pub mod validator;

pub use model::{Step, Workflow};
pub use parser::{load_workflow, parse_workflow_json, parse_workflow_yaml, save_workflow, LoadError};
pub use state::{RunState, RunStatus, StepResult, TaskOutput};
pub use validator::{lint_workflow, LintIssue};
