//! Workflow Execution Module
//!
//! Provides the engine that runs workflows step by step, the per-step
//! execution logic, condition evaluation, and the error types a run can
//! end with.
//!
//! # Architecture
//!
//! - [`engine`]: Main execution engine and the step-transition loop
//! - [`step`]: Single-step execution (condition gate, task invocation)
//! - [`condition`]: `"<step>.<field>"` condition evaluation
//! - [`error`]: Run error kinds
//! - [`shared`]: Thread-safe handle around one engine

pub mod condition;
pub mod engine;
pub mod error;
pub mod shared;
pub mod step;

pub use condition::evaluate_condition;
pub use engine::Engine;
pub use error::{ErrorKind, ExecutionError, RunFailure};
pub use shared::SharedEngine;
pub use step::StepOutcome;
