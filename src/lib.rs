//! Flowline - Sequential Workflow Execution Engine
//!
//! Runs declarative workflows: an ordered list of named steps, each bound to
//! a task, an optional condition over earlier results, and parameters. A run
//! starts at the first step, follows each step's first successor, and ends
//! when a step has nowhere to go or fails.
//!
//! # Architecture
//!
//! The library is organized into four main modules:
//!
//! - [`workflow`]: Workflow definitions, run state, and JSON/YAML loading
//! - [`tasks`]: The task trait, the task catalog, and built-in sample tasks
//! - [`execution`]: The engine, step execution, and condition evaluation
//! - [`monitoring`]: Per-run step timeline
//!
//! # Example
//!
//! ```rust,no_run
//! use flowline::Engine;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new();
//!     engine.register_default_tasks();
//!
//!     // Load a workflow from JSON or YAML
//!     let name = engine.load_file("order_process.json")?;
//!
//!     // Run it and inspect the result
//!     let state = engine.run(&name)?;
//!     println!("completed: {:?}", state.completed_steps);
//!     Ok(())
//! }
//! ```

pub mod execution;
pub mod monitoring;
pub mod tasks;
pub mod workflow;

// Re-export commonly used types
pub use execution::{Engine, ExecutionError, RunFailure, SharedEngine};
pub use tasks::{Task, TaskCatalog, TaskError};
pub use workflow::{load_workflow, RunState, RunStatus, Step, StepResult, TaskOutput, Workflow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "Flowline";
