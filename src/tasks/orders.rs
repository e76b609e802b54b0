//! Order Handling Tasks
//!
//! Sample tasks for an order pipeline. They simulate their side effects
//! by logging what a real integration would do.

use std::collections::HashMap;

use log::info;
use serde_json::json;

use super::{output_from, required_param, timestamp, Task, TaskError};
use crate::workflow::{RunState, TaskOutput};

/// Sends an email rendered from a named template.
///
/// Params: `template` (required).
#[derive(Debug, Clone, Copy, Default)]
pub struct SendEmailTask;

impl Task for SendEmailTask {
    fn name(&self) -> &str {
        "send_email"
    }

    fn execute(
        &self,
        params: &HashMap<String, String>,
        _state: &RunState,
    ) -> Result<TaskOutput, TaskError> {
        let template = required_param(params, "template")?;
        info!("Sending email with template: {}", template);

        Ok(output_from(json!({
            "sent": true,
            "template": template,
            "time": timestamp(),
        })))
    }
}

/// Charges a payment.
///
/// Params: `amount` (required). The result's `success` field is what
/// `"<step>.success"` conditions downstream look at.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessPaymentTask;

impl Task for ProcessPaymentTask {
    fn name(&self) -> &str {
        "process_payment"
    }

    fn execute(
        &self,
        params: &HashMap<String, String>,
        _state: &RunState,
    ) -> Result<TaskOutput, TaskError> {
        let amount = required_param(params, "amount")?;
        info!("Processing payment of amount: {}", amount);

        Ok(output_from(json!({
            "success": true,
            "amount": amount,
            "time": timestamp(),
        })))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PackItemsTask;

impl Task for PackItemsTask {
    fn name(&self) -> &str {
        "pack_items"
    }

    fn execute(
        &self,
        _params: &HashMap<String, String>,
        state: &RunState,
    ) -> Result<TaskOutput, TaskError> {
        info!("Packing items for order ({})", state.workflow_name);

        Ok(output_from(json!({
            "packed": true,
            "time": timestamp(),
        })))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SendShippingNotificationTask;

impl Task for SendShippingNotificationTask {
    fn name(&self) -> &str {
        "send_shipping_notification"
    }

    fn execute(
        &self,
        _params: &HashMap<String, String>,
        _state: &RunState,
    ) -> Result<TaskOutput, TaskError> {
        info!("Sending shipping notification");

        Ok(output_from(json!({
            "sent": true,
            "time": timestamp(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_send_email() {
        let state = RunState::new("w");
        let out = SendEmailTask
            .execute(&params(&[("template", "welcome")]), &state)
            .unwrap();

        assert_eq!(out["sent"], Value::Bool(true));
        assert_eq!(out["template"], "welcome");
        assert!(out["time"].is_string());
    }

    #[test]
    fn test_send_email_requires_template() {
        let err = SendEmailTask
            .execute(&HashMap::new(), &RunState::new("w"))
            .unwrap_err();
        assert_eq!(err.to_string(), "template parameter is required");
    }

    #[test]
    fn test_process_payment() {
        let out = ProcessPaymentTask
            .execute(&params(&[("amount", "100.00")]), &RunState::new("w"))
            .unwrap();

        assert_eq!(out["success"], Value::Bool(true));
        assert_eq!(out["amount"], "100.00");
    }

    #[test]
    fn test_process_payment_requires_amount() {
        let err = ProcessPaymentTask
            .execute(&HashMap::new(), &RunState::new("w"))
            .unwrap_err();
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn test_pack_items() {
        let out = PackItemsTask
            .execute(&HashMap::new(), &RunState::new("w"))
            .unwrap();
        assert_eq!(out["packed"], Value::Bool(true));
    }

    #[test]
    fn test_shipping_notification() {
        let out = SendShippingNotificationTask
            .execute(&HashMap::new(), &RunState::new("w"))
            .unwrap();
        assert_eq!(out["sent"], Value::Bool(true));
        assert_eq!(SendShippingNotificationTask.name(), "send_shipping_notification");
    }
}
