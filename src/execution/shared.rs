//! Shared Engine Handle
//!
//! The engine's workflow, state and catalog maps are plain fields with no
//! internal locking. `SharedEngine` puts one engine behind a mutex so it
//! can be used from several threads. Every call holds the lock for its
//! whole duration, which means runs on the same engine are serialised.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::tasks::Task;
use crate::workflow::{LoadError, RunState, Workflow};

use super::engine::Engine;
use super::error::RunFailure;

/// Cloneable, thread-safe handle to a single [`Engine`].
#[derive(Clone, Default)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// A task that panicked mid-run poisons the lock; the engine maps are
    /// only written between steps, so the guard is recovered.
    fn lock(&self) -> MutexGuard<'_, Engine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register_task(&self, task: impl Task + 'static) {
        self.lock().register_task(task);
    }

    pub fn load(&self, workflow: Workflow) -> Result<(), LoadError> {
        self.lock().load(workflow)
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<String, LoadError> {
        self.lock().load_file(path)
    }

    /// Runs a workflow while holding the engine lock.
    pub fn run(&self, workflow_name: &str) -> Result<RunState, RunFailure> {
        self.lock().run(workflow_name)
    }

    /// Returns a copy of the latest run state for a workflow.
    pub fn get_state(&self, workflow_name: &str) -> Option<RunState> {
        self.lock().get_state(workflow_name).cloned()
    }

    pub fn task_names(&self) -> Vec<String> {
        self.lock().task_names()
    }

    /// Runs a closure with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        f(&mut self.lock())
    }
}
