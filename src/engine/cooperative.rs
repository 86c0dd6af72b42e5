//! Cooperative engine - a single-threaded event loop gating offloaded work.
//!
//! The loop acquires one of `workers` permits per item and hands the item to
//! tokio's blocking pool, so a slow task never stalls the loop itself.
//! Results are awaited in submission order.

use std::sync::Arc;

use super::{EngineError, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooperativeEngine {
    workers: usize,
}

impl CooperativeEngine {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    #[cfg(feature = "async")]
    pub fn apply<K: Task>(
        &self,
        task: &Arc<K>,
        items: &Arc<[K::Input]>,
    ) -> Result<Vec<K::Output>, EngineError> {
        use super::panic_message;

        if items.is_empty() {
            return Ok(Vec::new());
        }

        if tokio::runtime::Handle::try_current().is_err() {
            return self.run_loop(task, items);
        }

        // Already on a runtime thread, where block_on would panic: give the
        // loop its own OS thread.
        std::thread::scope(|scope| {
            std::thread::Builder::new()
                .name("victimator-loop".to_string())
                .spawn_scoped(scope, || self.run_loop(task, items))
                .map_err(EngineError::Spawn)?
                .join()
                .map_err(|payload| EngineError::WorkerPanicked(panic_message(payload)))?
        })
    }

    #[cfg(not(feature = "async"))]
    pub fn apply<K: Task>(
        &self,
        _task: &Arc<K>,
        _items: &Arc<[K::Input]>,
    ) -> Result<Vec<K::Output>, EngineError> {
        Err(EngineError::Unavailable("async"))
    }

    #[cfg(feature = "async")]
    fn run_loop<K: Task>(
        &self,
        task: &Arc<K>,
        items: &Arc<[K::Input]>,
    ) -> Result<Vec<K::Output>, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .max_blocking_threads(self.workers)
            .thread_name("victimator-blocking")
            .build()
            .map_err(EngineError::Runtime)?;

        runtime.block_on(gather(self.workers, Arc::clone(task), Arc::clone(items)))
    }
}

#[cfg(feature = "async")]
async fn gather<K: Task>(
    workers: usize,
    task: Arc<K>,
    items: Arc<[K::Input]>,
) -> Result<Vec<K::Output>, EngineError> {
    use super::panic_message;
    use tokio::sync::Semaphore;

    let gate = Arc::new(Semaphore::new(workers));
    let mut pending = Vec::with_capacity(items.len());

    for index in 0..items.len() {
        let permit = Arc::clone(&gate)
            .acquire_owned()
            .await
            .map_err(|_| EngineError::Protocol("concurrency gate closed".to_string()))?;
        let task = Arc::clone(&task);
        let items = Arc::clone(&items);
        pending.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            task.run(&items[index])
        }));
    }

    let mut results = Vec::with_capacity(pending.len());
    for handle in pending {
        let output = handle.await.map_err(|err| {
            if err.is_panic() {
                EngineError::WorkerPanicked(panic_message(err.into_panic()))
            } else {
                EngineError::WorkerPanicked(err.to_string())
            }
        })?;
        results.push(output);
    }
    Ok(results)
}
