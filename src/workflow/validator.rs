//! Workflow Lint
//!
//! Reports structural problems in a workflow definition without rejecting
//! it. Loading never fails on these findings; the engine resolves step and
//! task references only when a run reaches them. Lint exists so that
//! authors can catch dangling references before a run does.

use std::collections::HashSet;
use std::fmt;

use log::{debug, warn};

use super::model::{Step, Workflow};
use crate::execution::condition::parse_condition;
use crate::tasks::TaskCatalog;

/// A problem found in a workflow definition.
#[derive(Debug, Clone, PartialEq)]
pub enum LintIssue {
    EmptyWorkflow,
    DuplicateStepId(String),
    EmptyStepId,
    EmptyTask(String),
    UnknownNext { step: String, next: String },
    IgnoredSuccessors { step: String, ignored: Vec<String> },
    MalformedCondition { step: String, condition: String },
    ConditionOnUnknownStep { step: String, reference: String },
    UnknownTask { step: String, task: String },
    Cycle { step: String, back_to: String },
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWorkflow => write!(f, "Workflow has no steps"),
            Self::DuplicateStepId(id) => write!(f, "Duplicate step ID: '{}'", id),
            Self::EmptyStepId => write!(f, "Step has empty or whitespace-only ID"),
            Self::EmptyTask(step) => write!(f, "Step '{}' has no task specified", step),
            Self::UnknownNext { step, next } => {
                write!(f, "Step '{}' references unknown next step '{}'", step, next)
            }
            Self::IgnoredSuccessors { step, ignored } => write!(
                f,
                "Step '{}' lists extra next steps {:?}; only the first is followed",
                step, ignored
            ),
            Self::MalformedCondition { step, condition } => write!(
                f,
                "Step '{}': condition '{}' is not of the form step.field and always skips",
                step, condition
            ),
            Self::ConditionOnUnknownStep { step, reference } => write!(
                f,
                "Step '{}': condition references unknown step '{}'",
                step, reference
            ),
            Self::UnknownTask { step, task } => {
                write!(f, "Step '{}' uses unregistered task '{}'", step, task)
            }
            Self::Cycle { step, back_to } => write!(
                f,
                "Step '{}' leads back to '{}'; the run never ends while these steps succeed",
                step, back_to
            ),
        }
    }
}

/// Checks a single step's own fields.
fn lint_step(step: &Step, step_ids: &HashSet<&str>, catalog: Option<&TaskCatalog>) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    if step.id.trim().is_empty() {
        issues.push(LintIssue::EmptyStepId);
        return issues;
    }

    if step.task.trim().is_empty() {
        issues.push(LintIssue::EmptyTask(step.id.clone()));
    } else if let Some(catalog) = catalog {
        if !catalog.contains(&step.task) {
            issues.push(LintIssue::UnknownTask {
                step: step.id.clone(),
                task: step.task.clone(),
            });
        }
    }

    for next_id in &step.next {
        if !step_ids.contains(next_id.as_str()) {
            issues.push(LintIssue::UnknownNext {
                step: step.id.clone(),
                next: next_id.clone(),
            });
        }
    }

    if step.next.len() > 1 {
        issues.push(LintIssue::IgnoredSuccessors {
            step: step.id.clone(),
            ignored: step.next[1..].to_vec(),
        });
    }

    if let Some(condition) = step.active_condition() {
        match parse_condition(condition) {
            None => issues.push(LintIssue::MalformedCondition {
                step: step.id.clone(),
                condition: condition.to_string(),
            }),
            Some((reference, _)) if !step_ids.contains(reference) => {
                issues.push(LintIssue::ConditionOnUnknownStep {
                    step: step.id.clone(),
                    reference: reference.to_string(),
                })
            }
            Some(_) => {}
        }
    }

    if step.next.is_empty() {
        debug!("Step '{}' is a terminal step", step.id);
    }

    issues
}

/// Lints a workflow definition.
///
/// Pass a catalog to also flag task names that have no registered task.
pub fn lint_workflow(workflow: &Workflow, catalog: Option<&TaskCatalog>) -> Vec<LintIssue> {
    if workflow.steps.is_empty() {
        return vec![LintIssue::EmptyWorkflow];
    }

    let mut issues = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for step in &workflow.steps {
        if !step.id.trim().is_empty() && !seen.insert(step.id.as_str()) {
            issues.push(LintIssue::DuplicateStepId(step.id.clone()));
        }
    }

    for step in &workflow.steps {
        issues.extend(lint_step(step, &seen, catalog));
    }

    issues.extend(find_cycle(workflow));
    issues
}

/// Follows `next[0]` from the first step and reports the first revisit.
fn find_cycle(workflow: &Workflow) -> Option<LintIssue> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = workflow.start_step()?;

    loop {
        visited.insert(current.id.as_str());
        let next_id = current.successor()?;
        if visited.contains(next_id) {
            return Some(LintIssue::Cycle {
                step: current.id.clone(),
                back_to: next_id.to_string(),
            });
        }
        current = workflow.get_step(next_id)?;
    }
}

/// Logs each lint finding as a warning and returns how many there were.
pub fn warn_issues(workflow: &Workflow, issues: &[LintIssue]) -> usize {
    for issue in issues {
        warn!("Workflow '{}': {}", workflow.name, issue);
    }
    issues.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{Task, TaskError};
    use crate::workflow::{RunState, TaskOutput};
    use std::collections::HashMap;

    struct Noop;

    impl Task for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn execute(
            &self,
            _params: &HashMap<String, String>,
            _state: &RunState,
        ) -> Result<TaskOutput, TaskError> {
            Ok(TaskOutput::new())
        }
    }

    #[test]
    fn test_clean_workflow() {
        let workflow = Workflow::new("w")
            .with_step(Step::new("a", "noop").then("b"))
            .with_step(Step::new("b", "noop").when("a.ok"));

        let mut catalog = TaskCatalog::new();
        catalog.register(Noop);

        assert!(lint_workflow(&workflow, Some(&catalog)).is_empty());
    }

    #[test]
    fn test_empty_workflow() {
        let issues = lint_workflow(&Workflow::new("w"), None);
        assert_eq!(issues, vec![LintIssue::EmptyWorkflow]);
    }

    #[test]
    fn test_duplicate_ids() {
        let workflow = Workflow::new("w")
            .with_step(Step::new("same", "t"))
            .with_step(Step::new("same", "t"));

        let issues = lint_workflow(&workflow, None);
        assert!(issues.contains(&LintIssue::DuplicateStepId("same".to_string())));
    }

    #[test]
    fn test_empty_id_and_task() {
        let workflow = Workflow::new("w")
            .with_step(Step::new("", "t"))
            .with_step(Step::new("b", ""));

        let issues = lint_workflow(&workflow, None);
        assert!(issues.contains(&LintIssue::EmptyStepId));
        assert!(issues.contains(&LintIssue::EmptyTask("b".to_string())));
    }

    #[test]
    fn test_unknown_next_and_extra_successors() {
        let workflow = Workflow::new("w")
            .with_step(Step::new("a", "t").then("b").then("ghost"))
            .with_step(Step::new("b", "t"));

        let issues = lint_workflow(&workflow, None);
        assert!(issues.contains(&LintIssue::UnknownNext {
            step: "a".to_string(),
            next: "ghost".to_string(),
        }));
        assert!(issues.contains(&LintIssue::IgnoredSuccessors {
            step: "a".to_string(),
            ignored: vec!["ghost".to_string()],
        }));
    }

    #[test]
    fn test_condition_issues() {
        let workflow = Workflow::new("w")
            .with_step(Step::new("a", "t").when("nodot"))
            .with_step(Step::new("b", "t").when("ghost.ok"))
            .with_step(Step::new("c", "t").when("a.b.c"));

        let issues = lint_workflow(&workflow, None);
        assert!(issues
            .iter()
            .any(|i| matches!(i, LintIssue::MalformedCondition { step, .. } if step == "a")));
        assert!(issues
            .iter()
            .any(|i| matches!(i, LintIssue::ConditionOnUnknownStep { reference, .. } if reference == "ghost")));
        assert!(issues
            .iter()
            .any(|i| matches!(i, LintIssue::MalformedCondition { step, .. } if step == "c")));
    }

    #[test]
    fn test_unknown_task_needs_catalog() {
        let workflow = Workflow::new("w").with_step(Step::new("a", "missing_task"));

        assert!(lint_workflow(&workflow, None).is_empty());

        let catalog = TaskCatalog::new();
        let issues = lint_workflow(&workflow, Some(&catalog));
        assert_eq!(
            issues,
            vec![LintIssue::UnknownTask {
                step: "a".to_string(),
                task: "missing_task".to_string(),
            }]
        );
    }

    #[test]
    fn test_cycle_detected() {
        let workflow = Workflow::new("w")
            .with_step(Step::new("a", "t").then("b"))
            .with_step(Step::new("b", "t").then("c"))
            .with_step(Step::new("c", "t").then("a"));

        let issues = lint_workflow(&workflow, None);
        assert_eq!(
            issues,
            vec![LintIssue::Cycle {
                step: "c".to_string(),
                back_to: "a".to_string(),
            }]
        );
    }

    #[test]
    fn test_self_loop_detected() {
        let workflow = Workflow::new("w").with_step(Step::new("a", "t").then("a"));
        let issues = lint_workflow(&workflow, None);
        assert!(issues.contains(&LintIssue::Cycle {
            step: "a".to_string(),
            back_to: "a".to_string(),
        }));
    }

    #[test]
    fn test_issue_display() {
        assert_eq!(LintIssue::EmptyWorkflow.to_string(), "Workflow has no steps");

        let issue = LintIssue::UnknownNext {
            step: "a".to_string(),
            next: "z".to_string(),
        };
        assert!(issue.to_string().contains("'z'"));
    }

    #[test]
    fn test_warn_issues_counts() {
        let workflow = Workflow::new("w");
        let issues = lint_workflow(&workflow, None);
        assert_eq!(warn_issues(&workflow, &issues), 1);
    }
}
