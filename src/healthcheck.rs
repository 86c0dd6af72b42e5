//! `--self-check`: output path writability and a probe through every engine.

use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::{EngineCoordinator, EngineMode, Probe, ResolvedMode};

const PROBE_INPUT: [i64; 3] = [1, 2, 3];
const PROBE_EXPECTED: [i64; 3] = [2, 4, 6];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelfCheck {
    pub ok: bool,
    pub messages: Vec<String>,
}

impl SelfCheck {
    fn pass(&mut self, message: String) {
        self.messages.push(message);
    }

    fn fail(&mut self, message: String) {
        self.ok = false;
        self.messages.push(message);
    }
}

/// Runs every check; never stops at the first failure.
///
/// `worker_program` overrides the executable started by the process engine.
pub fn run_self_check(output_root: &Path, workers: usize, worker_program: Option<PathBuf>) -> SelfCheck {
    let mut check = SelfCheck {
        ok: true,
        messages: Vec::new(),
    };

    match probe_output_root(output_root) {
        Ok(()) => check.pass("Output path write check: OK".to_string()),
        Err(err) => check.fail(format!("Output path write check: FAIL ({err})")),
    }

    for mode in [EngineMode::Async, EngineMode::Threading, EngineMode::Parallel] {
        let mut coordinator = EngineCoordinator::new(mode, workers.clamp(1, 2));
        if let Some(program) = &worker_program {
            coordinator = coordinator.with_worker_program(program.clone());
        }

        match coordinator.dispatch(Probe, PROBE_INPUT.to_vec()) {
            Ok(done) if done.mode == ResolvedMode::ThreadingFallback => {
                check.fail(format!("Engine {mode}: FAIL (only succeeded through fallback)"));
            }
            Ok(done) if done.results != PROBE_EXPECTED => {
                check.fail(format!("Engine {mode}: FAIL (unexpected output)"));
            }
            Ok(_) => check.pass(format!("Engine {mode}: OK")),
            Err(err) => check.fail(format!("Engine {mode}: FAIL ({err})")),
        }
    }

    check
}

fn probe_output_root(output_root: &Path) -> std::io::Result<()> {
    fs::create_dir_all(output_root)?;
    let probe = output_root.join(".self-check-write.tmp");
    fs::write(&probe, "ok")?;
    fs::remove_file(&probe)
}
