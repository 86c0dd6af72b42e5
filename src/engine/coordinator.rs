//! Engine coordinator - picks an engine per call and owns the fallback.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

use super::{
    CooperativeEngine, Engine, EngineError, EngineMode, ProcessPoolEngine, ResolvedMode, Task,
    ThreadPoolEngine,
};
use crate::logging::LogSink;

/// `auto` switches to the thread pool above this many items.
pub const THREADING_ABOVE: usize = 2_000;
/// `auto` switches to worker processes above this many items.
pub const PARALLEL_ABOVE: usize = 15_000;

/// Results of one dispatch and the mode that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched<R> {
    pub results: Vec<R>,
    pub mode: ResolvedMode,
}

/// Maps a requested mode and workload size to a concrete engine choice.
pub fn resolve_mode(requested: EngineMode, item_count: usize) -> ResolvedMode {
    match requested {
        EngineMode::Async => ResolvedMode::Async,
        EngineMode::Threading => ResolvedMode::Threading,
        EngineMode::Parallel => ResolvedMode::Parallel,
        EngineMode::Auto if item_count > PARALLEL_ABOVE => ResolvedMode::Parallel,
        EngineMode::Auto if item_count > THREADING_ABOVE => ResolvedMode::Threading,
        EngineMode::Auto => ResolvedMode::Async,
    }
}

/// Stateless across calls: each dispatch owns its items and results.
#[derive(Clone)]
pub struct EngineCoordinator {
    requested: EngineMode,
    workers: usize,
    logger: Option<Arc<dyn LogSink>>,
    worker_program: Option<PathBuf>,
}

impl std::fmt::Debug for EngineCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCoordinator")
            .field("requested", &self.requested)
            .field("workers", &self.workers)
            .field("logger", &self.logger.is_some())
            .field("worker_program", &self.worker_program)
            .finish()
    }
}

impl EngineCoordinator {
    /// `workers` below 1 is raised to 1.
    pub fn new(requested: EngineMode, workers: usize) -> Self {
        Self {
            requested,
            workers: workers.max(1),
            logger: None,
            worker_program: None,
        }
    }

    /// Receives the fallback warning.
    pub fn with_logger(mut self, logger: Arc<dyn LogSink>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Program started for the process engine.
    ///
    /// Without one, the process engine uses the current executable only if it
    /// called [`enable_current_exe_workers`](super::enable_current_exe_workers);
    /// otherwise that engine is unavailable and the dispatch falls back.
    pub fn with_worker_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.worker_program = Some(program.into());
        self
    }

    pub fn requested(&self) -> EngineMode {
        self.requested
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn engine_for(&self, mode: ResolvedMode) -> Result<Engine, EngineError> {
        match mode {
            ResolvedMode::Async => Ok(Engine::Cooperative(CooperativeEngine::new(self.workers))),
            ResolvedMode::Parallel => {
                let engine = match &self.worker_program {
                    Some(program) => ProcessPoolEngine::new(self.workers, program.clone()),
                    None => ProcessPoolEngine::for_current_exe(self.workers)?,
                };
                Ok(Engine::ProcessPool(engine))
            }
            ResolvedMode::Threading | ResolvedMode::ThreadingFallback | ResolvedMode::None => {
                Ok(Engine::ThreadPool(ThreadPoolEngine::new(self.workers)))
            }
        }
    }

    /// Applies `task` to every item and returns results in input order.
    ///
    /// If the chosen engine fails, the whole list is re-run once on the
    /// thread pool and the mode becomes [`ResolvedMode::ThreadingFallback`].
    ///
    /// # Errors
    ///
    /// Returns the thread pool's error when the fallback also fails.
    pub fn dispatch<K: Task>(
        &self,
        task: K,
        items: Vec<K::Input>,
    ) -> Result<Dispatched<K::Output>, EngineError> {
        if items.is_empty() {
            return Ok(Dispatched {
                results: Vec::new(),
                mode: ResolvedMode::None,
            });
        }

        let mode = resolve_mode(self.requested, items.len());
        tracing::debug!(
            requested = %self.requested,
            resolved = %mode,
            items = items.len(),
            workers = self.workers,
            "dispatching {}",
            K::KIND
        );

        let task = Arc::new(task);
        let items: Arc<[K::Input]> = Arc::from(items);

        let primary = self
            .engine_for(mode)
            .and_then(|engine| engine.apply(&task, &items));

        match primary {
            Ok(results) => Ok(Dispatched { results, mode }),
            Err(err) => {
                if let Some(logger) = &self.logger {
                    logger.log(
                        Level::WARN,
                        &format!("Engine '{mode}' failed ({err}). Falling back to threading."),
                    );
                }
                let results = ThreadPoolEngine::new(self.workers).apply(task.as_ref(), &items)?;
                Ok(Dispatched {
                    results,
                    mode: ResolvedMode::ThreadingFallback,
                })
            }
        }
    }
}
