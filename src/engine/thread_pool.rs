//! Thread-pool engine - `workers` OS threads pull items from a shared cursor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use super::{panic_message, EngineError, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadPoolEngine {
    workers: usize,
}

impl ThreadPoolEngine {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn apply<K: Task>(&self, task: &K, items: &[K::Input]) -> Result<Vec<K::Output>, EngineError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let threads = self.workers.min(items.len());
        let cursor = AtomicUsize::new(0);

        let joined = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(threads);
            for n in 0..threads {
                let cursor = &cursor;
                let spawned = thread::Builder::new()
                    .name(format!("victimator-pool-{n}"))
                    .spawn_scoped(scope, move || {
                        let mut done = Vec::new();
                        loop {
                            let index = cursor.fetch_add(1, Ordering::Relaxed);
                            if index >= items.len() {
                                break;
                            }
                            done.push((index, task.run(&items[index])));
                        }
                        done
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    // threads already running drain the remaining items
                    Err(err) if !handles.is_empty() => {
                        tracing::warn!("thread pool running short-handed: {}", err);
                        break;
                    }
                    Err(err) => return Err(EngineError::Spawn(err)),
                }
            }
            // join every handle so a panicking worker never escapes the scope
            Ok(handles.into_iter().map(|h| h.join()).collect::<Vec<_>>())
        })?;

        let mut slots: Vec<Option<K::Output>> =
            std::iter::repeat_with(|| None).take(items.len()).collect();
        for batch in joined {
            let batch = batch.map_err(|payload| EngineError::WorkerPanicked(panic_message(payload)))?;
            for (index, output) in batch {
                slots[index] = Some(output);
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| EngineError::Protocol(format!("no result for item {index}")))
            })
            .collect()
    }
}
