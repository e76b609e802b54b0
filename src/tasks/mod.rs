//! Task Capability and Catalog
//!
//! A task is a pluggable unit of work invoked by a workflow step. The
//! engine treats every task as a black box with a single entry point and
//! looks tasks up by name in a [`TaskCatalog`].
//!
//! # Built-in Tasks
//!
//! - [`orders`]: order handling samples (email, payment, packing, shipping)
//! - [`files`]: file pipeline samples (validate, process, save)

pub mod files;
pub mod orders;

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use log::debug;

use crate::workflow::{RunState, TaskOutput};

/// Error type returned by task implementations.
pub type TaskError = Box<dyn Error + Send + Sync>;

/// A unit of work that a workflow step can invoke.
///
/// `execute` receives the step's parameters and a read-only view of the
/// current run, so a task can read earlier steps' results. Any side effect
/// is the task's own business. Returning an error fails the step and the
/// whole run.
pub trait Task: Send + Sync {
    /// Name the task is registered under.
    fn name(&self) -> &str;

    /// Runs the task.
    fn execute(
        &self,
        params: &HashMap<String, String>,
        state: &RunState,
    ) -> Result<TaskOutput, TaskError>;
}

/// Fetches a required parameter or fails with `"<key> parameter is required"`.
pub fn required_param<'a>(
    params: &'a HashMap<String, String>,
    key: &str,
) -> Result<&'a str, TaskError> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| format!("{} parameter is required", key).into())
}

/// Converts a `json!({...})` object into a task output. Non-object values
/// produce an empty output.
pub fn output_from(value: serde_json::Value) -> TaskOutput {
    match value {
        serde_json::Value::Object(map) => map,
        _ => TaskOutput::new(),
    }
}

/// Current time as RFC 3339, stamped into built-in task results.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Name to task lookup table used at execution time.
#[derive(Default)]
pub struct TaskCatalog {
    tasks: HashMap<String, Box<dyn Task>>,
}

impl TaskCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Creates a catalog holding every built-in task.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register_defaults();
        catalog
    }

    /// Registers all built-in tasks.
    pub fn register_defaults(&mut self) {
        self.register(orders::SendEmailTask);
        self.register(orders::ProcessPaymentTask);
        self.register(orders::PackItemsTask);
        self.register(orders::SendShippingNotificationTask);
        self.register(files::ValidateFileTask);
        self.register(files::ProcessFileTask);
        self.register(files::SaveToDatabaseTask);
    }

    /// Registers a task under its declared name. A task already registered
    /// under that name is replaced.
    pub fn register(&mut self, task: impl Task + 'static) {
        self.register_boxed(Box::new(task));
    }

    /// Registers an already boxed task.
    pub fn register_boxed(&mut self, task: Box<dyn Task>) {
        let name = task.name().to_string();
        if self.tasks.insert(name.clone(), task).is_some() {
            debug!("Task '{}' re-registered, previous entry replaced", name);
        }
    }

    /// Looks up a task by name.
    pub fn get(&self, name: &str) -> Option<&dyn Task> {
        self.tasks.get(name).map(|task| task.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Names of all registered tasks, in no particular order.
    pub fn list(&self) -> Vec<String> {
        self.tasks.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl fmt::Debug for TaskCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskCatalog")
            .field("tasks", &self.tasks.keys().collect::<Vec<_>>())
            .finish()
    }
}
