//! File Pipeline Tasks
//!
//! Sample tasks for a validate, process, save pipeline. `save_to_database`
//! shows how a task reads an earlier step's result from the run state.

use std::collections::HashMap;

use log::{debug, info};
use serde_json::{json, Value};

use super::{output_from, required_param, timestamp, Task, TaskError};
use crate::workflow::{RunState, TaskOutput};

/// Records reported by `process_file`.
const PROCESSED_RECORDS: i64 = 100;

/// Step whose `records` field `save_to_database` reads by default.
const DEFAULT_SOURCE_STEP: &str = "process";

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateFileTask;

impl Task for ValidateFileTask {
    fn name(&self) -> &str {
        "validate_file"
    }

    fn execute(
        &self,
        params: &HashMap<String, String>,
        _state: &RunState,
    ) -> Result<TaskOutput, TaskError> {
        let file_path = required_param(params, "file_path")?;
        info!("Validating file: {}", file_path);

        Ok(output_from(json!({
            "valid": true,
            "file_path": file_path,
            "time": timestamp(),
        })))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessFileTask;

impl Task for ProcessFileTask {
    fn name(&self) -> &str {
        "process_file"
    }

    fn execute(
        &self,
        params: &HashMap<String, String>,
        _state: &RunState,
    ) -> Result<TaskOutput, TaskError> {
        let file_path = required_param(params, "file_path")?;
        info!("Processing file: {}", file_path);

        Ok(output_from(json!({
            "processed": true,
            "file_path": file_path,
            "records": PROCESSED_RECORDS,
            "time": timestamp(),
        })))
    }
}

/// Saves processed records.
///
/// Reads `records` from the result of the step named by the optional
/// `source_step` param (default `process`). A missing step, field, or a
/// non-integer value counts as zero records.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveToDatabaseTask;

impl Task for SaveToDatabaseTask {
    fn name(&self) -> &str {
        "save_to_database"
    }

    fn execute(
        &self,
        params: &HashMap<String, String>,
        state: &RunState,
    ) -> Result<TaskOutput, TaskError> {
        let source = params
            .get("source_step")
            .map(String::as_str)
            .unwrap_or(DEFAULT_SOURCE_STEP);

        let records = state
            .result(source)
            .and_then(|result| result.field("records"))
            .and_then(Value::as_i64)
            .unwrap_or(0);

        debug!("Read {} records from step '{}'", records, source);
        info!("Saving data to database");

        Ok(output_from(json!({
            "saved": true,
            "records": records,
            "time": timestamp(),
        })))
    }
}
