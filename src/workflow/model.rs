//! Workflow Data Model
//!
//! Core data structures representing a workflow definition and its steps.
//!
//! # Example JSON Format
//!
//! ```json
//! {
//!   "name": "order_process",
//!   "steps": [
//!     { "id": "payment", "task": "process_payment",
//!       "next": ["prepare_order"], "params": { "amount": "100.00" } },
//!     { "id": "prepare_order", "task": "pack_items",
//!       "condition": "payment.success" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents a single step in a workflow.
///
/// Each step binds a task from the catalog to its parameters, an optional
/// gating condition, and the step that follows it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Step {
    /// Identifier, unique within the workflow
    pub id: String,

    /// Name of the task in the catalog
    pub task: String,

    /// Successor step ids. Only the first entry is ever followed.
    #[serde(default)]
    pub next: Vec<String>,

    /// Optional gate of the form `"<stepId>.<field>"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Parameters handed to the task
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, String>,
}

impl Step {
    /// Creates a new Step bound to a task.
    ///
    /// # Example
    ///
    /// ```
    /// use flowline::workflow::Step;
    ///
    /// let step = Step::new("payment", "process_payment")
    ///     .with_param("amount", "100.00")
    ///     .then("prepare_order");
    /// ```
    pub fn new(id: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            id: id.into().trim().to_string(),
            task: task.into().trim().to_string(),
            next: Vec::new(),
            condition: None,
            params: HashMap::new(),
        }
    }

    /// Appends a successor step id.
    pub fn then(mut self, step_id: impl Into<String>) -> Self {
        self.next.push(step_id.into());
        self
    }

    /// Sets the gating condition.
    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Adds a single parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns the condition if one is set and non-empty.
    pub fn active_condition(&self) -> Option<&str> {
        self.condition.as_deref().filter(|c| !c.is_empty())
    }

    /// Returns the successor that a successful run of this step leads to.
    pub fn successor(&self) -> Option<&str> {
        self.next.first().map(String::as_str)
    }
}

/// Represents a complete workflow definition.
///
/// Immutable once handed to the engine. The first step is always the
/// start of a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workflow {
    /// Workflow name, unique within an engine
    pub name: String,

    /// Ordered list of steps
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Workflow {
    /// Creates a new empty workflow.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Creates a workflow from a list of steps.
    pub fn from_steps(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Appends a step.
    pub fn add_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Builder form of [`Workflow::add_step`].
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Gets a step by ID (linear scan, first match wins).
    pub fn get_step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Returns the step a run starts from.
    pub fn start_step(&self) -> Option<&Step> {
        self.steps.first()
    }

    /// Returns the sorted, de-duplicated task names referenced by the steps.
    pub fn task_names(&self) -> Vec<String> {
        let mut tasks: Vec<String> = self.steps.iter().map(|s| s.task.clone()).collect();
        tasks.sort();
        tasks.dedup();
        tasks
    }

    /// Returns the number of steps in the workflow.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the workflow has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_creation() {
        let step = Step::new(" pay ", "process_payment")
            .with_param("amount", "10")
            .then("pack")
            .when("check.ok");

        assert_eq!(step.id, "pay");
        assert_eq!(step.task, "process_payment");
        assert_eq!(step.params.get("amount").map(String::as_str), Some("10"));
        assert_eq!(step.next, vec!["pack"]);
        assert_eq!(step.active_condition(), Some("check.ok"));
    }

    #[test]
    fn test_empty_condition_is_inactive() {
        let step = Step::new("a", "t").when("");
        assert!(step.active_condition().is_none());
    }

    #[test]
    fn test_successor_is_first_next() {
        let step = Step::new("a", "t").then("b").then("c");
        assert_eq!(step.successor(), Some("b"));
        assert!(Step::new("z", "t").successor().is_none());
    }

    #[test]
    fn test_workflow_lookup() {
        let workflow = Workflow::new("w")
            .with_step(Step::new("a", "t1"))
            .with_step(Step::new("b", "t2"));

        assert_eq!(workflow.len(), 2);
        assert_eq!(workflow.start_step().map(|s| s.id.as_str()), Some("a"));
        assert!(workflow.get_step("b").is_some());
        assert!(workflow.get_step("missing").is_none());
    }

    #[test]
    fn test_empty_workflow() {
        let workflow = Workflow::new("empty");
        assert!(workflow.is_empty());
        assert!(workflow.start_step().is_none());
    }

    #[test]
    fn test_task_names_deduplicated() {
        let workflow = Workflow::from_steps(
            "w",
            vec![
                Step::new("a", "send_email"),
                Step::new("b", "pack_items"),
                Step::new("c", "send_email"),
            ],
        );
        assert_eq!(workflow.task_names(), vec!["pack_items", "send_email"]);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"name": "w", "steps": [{"id": "a", "task": "t"}]}"#;
        let workflow: Workflow = serde_json::from_str(json).unwrap();

        let step = &workflow.steps[0];
        assert!(step.next.is_empty());
        assert!(step.condition.is_none());
        assert!(step.params.is_empty());
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let workflow = Workflow::new("w").with_step(Step::new("a", "t"));
        let json = serde_json::to_string(&workflow).unwrap();

        assert!(!json.contains("condition"));
        assert!(!json.contains("params"));
        assert!(json.contains("\"next\":[]"));
    }
}
