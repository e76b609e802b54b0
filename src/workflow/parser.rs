//! Workflow Parser
//!
//! Loads workflow definitions from JSON or YAML files. The format is chosen
//! by file extension. Parsing checks only that the workflow has a name;
//! step and task references are resolved when the workflow runs.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use super::model::Workflow;

/// Errors raised while reading or decoding a workflow definition.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read workflow file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to parse workflow JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse workflow YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("workflow must have a name")]
    MissingName,
}

/// Definition file formats understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Picks the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

/// Loads a workflow from a `.json`, `.yaml` or `.yml` file.
///
/// # Example
///
/// ```rust,no_run
/// use flowline::workflow::load_workflow;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let workflow = load_workflow("order_process.json")?;
///     println!("Loaded '{}' with {} steps", workflow.name, workflow.len());
///     Ok(())
/// }
/// ```
pub fn load_workflow(path: impl AsRef<Path>) -> Result<Workflow, LoadError> {
    let path = path.as_ref();
    info!("Loading workflow from: {}", path.display());

    let format =
        Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Definition loaded ({} bytes)", content.len());

    match format {
        Format::Json => parse_workflow_json(&content),
        Format::Yaml => parse_workflow_yaml(&content),
    }
}

/// Parses a workflow definition from a JSON string.
pub fn parse_workflow_json(content: &str) -> Result<Workflow, LoadError> {
    let workflow: Workflow = serde_json::from_str(content)?;
    check_name(workflow)
}

/// Parses a workflow definition from a YAML string.
pub fn parse_workflow_yaml(content: &str) -> Result<Workflow, LoadError> {
    let workflow: Workflow = serde_yaml::from_str(content)?;
    check_name(workflow)
}

fn check_name(workflow: Workflow) -> Result<Workflow, LoadError> {
    if workflow.name.trim().is_empty() {
        return Err(LoadError::MissingName);
    }

    info!(
        "Parsed workflow '{}' ({} steps)",
        workflow.name,
        workflow.steps.len()
    );
    Ok(workflow)
}

/// Saves a workflow to a JSON or YAML file, chosen by extension.
pub fn save_workflow(workflow: &Workflow, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    let format =
        Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

    let content = match format {
        Format::Json => serde_json::to_string_pretty(workflow)?,
        Format::Yaml => serde_yaml::to_string(workflow)?,
    };

    fs::write(path, content).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Workflow saved to: {}", path.display());
    Ok(())
}
