//! Step Conditions
//!
//! A condition has the form `"<stepId>.<field>"` and holds only when that
//! step has a recorded result whose data field is the boolean `true`.
//! Evaluation never fails: malformed text or missing data reads as `false`.

use serde_json::Value;

use crate::workflow::RunState;

/// Splits a condition into `(step_id, field)`.
///
/// Returns `None` unless the text contains exactly one `.`.
pub fn parse_condition(condition: &str) -> Option<(&str, &str)> {
    let mut parts = condition.split('.');
    let step_id = parts.next()?;
    let field = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((step_id, field))
}

/// Evaluates a condition against the current run state.
pub fn evaluate_condition(condition: &str, state: &RunState) -> bool {
    let Some((step_id, field)) = parse_condition(condition) else {
        return false;
    };

    state
        .result(step_id)
        .and_then(|result| result.field(field))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::output_from;
    use serde_json::json;

    fn state_with(step: &str, data: Value) -> RunState {
        let mut state = RunState::new("w");
        state.record_success(step, output_from(data));
        state
    }

    #[test]
    fn test_parse_condition() {
        assert_eq!(parse_condition("s1.success"), Some(("s1", "success")));
        assert_eq!(parse_condition("nodot"), None);
        assert_eq!(parse_condition("a.b.c"), None);
        assert_eq!(parse_condition("a."), Some(("a", "")));
    }

    #[test]
    fn test_true_field() {
        let state = state_with("s1", json!({"success": true}));
        assert!(evaluate_condition("s1.success", &state));
    }

    #[test]
    fn test_false_or_missing_field() {
        let state = state_with("s1", json!({"success": false}));
        assert!(!evaluate_condition("s1.success", &state));

        let state = state_with("s1", json!({"other": true}));
        assert!(!evaluate_condition("s1.success", &state));
    }

    #[test]
    fn test_non_boolean_field() {
        let state = state_with("s1", json!({"success": "true", "count": 1}));
        assert!(!evaluate_condition("s1.success", &state));
        assert!(!evaluate_condition("s1.count", &state));
    }

    #[test]
    fn test_malformed_condition() {
        let state = state_with("s1", json!({"success": true}));
        assert!(!evaluate_condition("s1success", &state));
        assert!(!evaluate_condition("s1.success.extra", &state));
        assert!(!evaluate_condition("", &state));
    }

    #[test]
    fn test_unknown_step() {
        let state = state_with("s1", json!({"success": true}));
        assert!(!evaluate_condition("s2.success", &state));
    }

    #[test]
    fn test_failed_step_has_no_data() {
        let mut state = RunState::new("w");
        state.record_failure("s1", "boom");
        assert!(!evaluate_condition("s1.success", &state));
    }
}
