//! Flowline CLI Entry Point
//!
//! Provides command-line interface for workflow execution.
//!
//! # Usage
//!
//! ```bash
//! # Run a workflow
//! flowline run order_process.json
//!
//! # Shorthand for run
//! flowline order_process.json
//!
//! # Print the final run state as JSON
//! flowline run order_process.json --json
//!
//! # Lint a workflow against the built-in tasks
//! flowline validate order_process.yaml
//!
//! # List built-in tasks
//! flowline tasks
//! ```

use std::env;
use std::process::ExitCode;

use colored::Colorize;
use log::{error, info};

use flowline::execution::Engine;
use flowline::workflow::{lint_workflow, load_workflow, RunState, RunStatus};
use flowline::{TaskCatalog, APP_NAME, VERSION};

/// What the CLI was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Validate,
    Tasks,
    Help,
    Version,
}

/// Command-line configuration parsed from arguments.
#[derive(Debug)]
struct Config {
    command: Command,
    workflow_path: Option<String>,
    verbose: bool,
    json: bool,
    timeline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: Command::Run,
            workflow_path: None,
            verbose: false,
            json: false,
            timeline: false,
        }
    }
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: flowline [COMMAND] [OPTIONS] <WORKFLOW_FILE>");
    println!();
    println!("Commands:");
    println!("  run <FILE>          Load and run a workflow (default)");
    println!("  validate <FILE>     Lint a workflow against the built-in tasks");
    println!("  tasks               List built-in tasks");
    println!();
    println!("Options:");
    println!("  -f, --file PATH     Workflow file (.json, .yaml, .yml)");
    println!("  --json              Print the final run state as JSON");
    println!("  --timeline          Print the step timeline after the run");
    println!("  -v, --verbose       Enable debug logging");
    println!("  -h, --help          Show this help message");
    println!("  -V, --version       Show version information");
    println!();
    println!("Examples:");
    println!("  flowline run order_process.json");
    println!("  flowline validate file_processing.yaml");
}

/// Parses command-line arguments into a Config struct.
fn parse_arguments(args: &[String]) -> Result<Config, String> {
    let mut config = Config::default();
    let mut positional_index = 0;
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => config.command = Command::Help,
            "--version" | "-V" => config.command = Command::Version,
            "--verbose" | "-v" => config.verbose = true,
            "--json" => config.json = true,
            "--timeline" => config.timeline = true,
            "--file" | "-f" => {
                i += 1;
                if i >= args.len() {
                    return Err(format!("{} requires a path argument", arg));
                }
                config.workflow_path = Some(args[i].clone());
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                match (positional_index, arg.as_str()) {
                    (0, "run") => config.command = Command::Run,
                    (0, "validate") => config.command = Command::Validate,
                    (0, "tasks") => config.command = Command::Tasks,
                    (_, path) if config.workflow_path.is_none() => {
                        config.workflow_path = Some(path.to_string())
                    }
                    _ => return Err(format!("Unexpected argument: {}", arg)),
                }
                positional_index += 1;
            }
        }
        i += 1;
    }

    if matches!(config.command, Command::Run | Command::Validate) && config.workflow_path.is_none()
    {
        return Err("a workflow file is required".to_string());
    }

    Ok(config)
}

/// Prints a human-readable summary of a finished run.
fn print_summary(state: &RunState) {
    let status = match state.status {
        RunStatus::Completed => state.status.as_str().green().bold(),
        RunStatus::Failed => state.status.as_str().red().bold(),
        RunStatus::Running => state.status.as_str().yellow(),
    };

    println!();
    println!("Workflow '{}' finished with status: {}", state.workflow_name, status);
    if let Some(duration) = state.duration() {
        println!("Duration: {} ms", duration.num_milliseconds());
    }

    println!("Completed steps: {}", state.completed_steps.join(" -> "));
    println!("Step results:");

    let mut step_ids: Vec<&String> = state.step_results.keys().collect();
    step_ids.sort();
    for step_id in step_ids {
        let result = &state.step_results[step_id];
        match &result.error {
            None => println!("  {}: {}", step_id, "ok".green()),
            Some(message) => println!("  {}: {} ({})", step_id, "failed".red(), message),
        }
    }
}

/// Loads and runs a workflow file. Returns whether the run completed.
fn run_workflow(config: &Config, path: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let mut engine = Engine::new();
    engine.register_default_tasks();

    let name = engine.load_file(path)?;
    info!("Running workflow: {}", name);

    let (state, completed) = match engine.run(&name) {
        Ok(state) => (Some(state), true),
        Err(failure) => {
            error!("Error running workflow: {}", failure);
            (failure.into_state(), false)
        }
    };

    if let Some(state) = state {
        if config.json {
            println!("{}", serde_json::to_string_pretty(&state)?);
        } else {
            print_summary(&state);
        }
    }

    if config.timeline {
        if let Some(timeline) = engine.timeline(&name) {
            println!("{}", timeline.gantt_chart());
        }
    }

    Ok(completed)
}

/// Lints a workflow file. Returns whether it was clean.
fn validate_workflow(path: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let workflow = load_workflow(path)?;
    let catalog = TaskCatalog::with_defaults();
    let issues = lint_workflow(&workflow, Some(&catalog));

    if issues.is_empty() {
        println!(
            "Workflow '{}' is valid ({} steps)",
            workflow.name,
            workflow.len()
        );
        return Ok(true);
    }

    println!("Workflow '{}' has {} issue(s):", workflow.name, issues.len());
    for issue in &issues {
        println!("  {} {}", "-".yellow(), issue);
    }
    Ok(false)
}

fn list_tasks() {
    let mut names = TaskCatalog::with_defaults().list();
    names.sort();
    println!("Built-in tasks:");
    for name in names {
        println!("  {}", name);
    }
}

/// Main application entry point.
fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let config = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    match config.command {
        Command::Help => {
            print_usage();
            return Ok(true);
        }
        Command::Version => {
            println!("{} {}", APP_NAME, VERSION);
            return Ok(true);
        }
        _ => {}
    }

    setup_logging(config.verbose);

    match (config.command, config.workflow_path.as_deref()) {
        (Command::Tasks, _) => {
            list_tasks();
            Ok(true)
        }
        (Command::Validate, Some(path)) => validate_workflow(path),
        (_, Some(path)) => run_workflow(&config, path),
        (_, None) => Err("a workflow file is required".into()),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("flowline")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_run_is_default_command() {
        let config = parse_arguments(&args(&["order.json"])).unwrap();
        assert_eq!(config.command, Command::Run);
        assert_eq!(config.workflow_path.as_deref(), Some("order.json"));
    }

    #[test]
    fn test_run_with_file_flag() {
        let config = parse_arguments(&args(&["run", "--file", "order.json", "--json"])).unwrap();
        assert_eq!(config.command, Command::Run);
        assert_eq!(config.workflow_path.as_deref(), Some("order.json"));
        assert!(config.json);
    }

    #[test]
    fn test_validate_command() {
        let config = parse_arguments(&args(&["validate", "w.yaml", "-v"])).unwrap();
        assert_eq!(config.command, Command::Validate);
        assert!(config.verbose);
    }

    #[test]
    fn test_tasks_needs_no_file() {
        let config = parse_arguments(&args(&["tasks"])).unwrap();
        assert_eq!(config.command, Command::Tasks);
    }

    #[test]
    fn test_missing_file() {
        assert!(parse_arguments(&args(&["run"])).is_err());
        assert!(parse_arguments(&args(&["run", "--file"])).is_err());
    }

    #[test]
    fn test_unknown_option_and_extra_argument() {
        assert!(parse_arguments(&args(&["--bogus"])).is_err());
        assert!(parse_arguments(&args(&["run", "a.json", "b.json"])).is_err());
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse_arguments(&args(&["--help"])).unwrap().command, Command::Help);
        assert_eq!(parse_arguments(&args(&["-V"])).unwrap().command, Command::Version);
    }
}
