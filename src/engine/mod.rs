//! Execution engines - apply a task to many items with bounded concurrency.
//!
//! Every engine satisfies the same contract: run [`Task::run`] once per item,
//! use at most `workers` concurrent units, and return results in input
//! order. [`EngineCoordinator`] picks the engine per call and falls back to
//! the thread pool once if the chosen engine fails.

mod cooperative;
mod coordinator;
mod process;
mod tasks;
mod thread_pool;

pub use cooperative::CooperativeEngine;
pub use coordinator::{resolve_mode, Dispatched, EngineCoordinator, PARALLEL_ABOVE, THREADING_ABOVE};
pub use process::{enable_current_exe_workers, serve_worker, ProcessPoolEngine, WORKER_ENV, WORKER_FLAG};
pub use tasks::{AssessTask, Probe};
pub use thread_pool::ThreadPoolEngine;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ConfigError;

/// A unit of work the engines can run, in-process or in a worker process.
///
/// The task value and its inputs/outputs cross process boundaries as JSON,
/// so `run` must depend only on `self` and `input`.
pub trait Task: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Registry key a worker process uses to rebuild the task.
    const KIND: &'static str;
    type Input: Serialize + DeserializeOwned + Send + Sync + 'static;
    type Output: Serialize + DeserializeOwned + Send + 'static;

    fn run(&self, input: &Self::Input) -> Self::Output;
}

/// Mode requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EngineMode {
    #[default]
    Auto,
    Async,
    Threading,
    Parallel,
}

impl EngineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineMode::Auto => "auto",
            EngineMode::Async => "async",
            EngineMode::Threading => "threading",
            EngineMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Ok(EngineMode::Auto),
            "async" => Ok(EngineMode::Async),
            "threading" => Ok(EngineMode::Threading),
            "parallel" => Ok(EngineMode::Parallel),
            _ => Err(ConfigError::UnknownMode(value.to_string())),
        }
    }
}

/// Mode a dispatch actually ran with. Never `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvedMode {
    /// Nothing to dispatch.
    None,
    Async,
    Threading,
    Parallel,
    ThreadingFallback,
}

impl ResolvedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedMode::None => "none",
            ResolvedMode::Async => "async",
            ResolvedMode::Threading => "threading",
            ResolvedMode::Parallel => "parallel",
            ResolvedMode::ThreadingFallback => "threading-fallback",
        }
    }
}

impl fmt::Display for ResolvedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("engine '{0}' is not available here")]
    Unavailable(&'static str),
    #[error("worker panicked: {0}")]
    WorkerPanicked(String),
    #[error("failed to spawn worker: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("worker I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("worker message encoding failed: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("worker protocol error: {0}")]
    Protocol(String),
    #[error("worker process exited with {0}")]
    WorkerExited(std::process::ExitStatus),
}

/// The closed set of engines behind one capability.
#[derive(Debug, Clone)]
pub enum Engine {
    Cooperative(CooperativeEngine),
    ThreadPool(ThreadPoolEngine),
    ProcessPool(ProcessPoolEngine),
}

impl Engine {
    /// Applies `task` to every item, preserving input order.
    pub fn apply<K: Task>(
        &self,
        task: &Arc<K>,
        items: &Arc<[K::Input]>,
    ) -> Result<Vec<K::Output>, EngineError> {
        match self {
            Engine::Cooperative(engine) => engine.apply(task, items),
            Engine::ThreadPool(engine) => engine.apply(task.as_ref(), items),
            Engine::ProcessPool(engine) => engine.apply(task.as_ref(), items),
        }
    }
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
