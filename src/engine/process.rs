//! Multi-process engine and the worker side of its wire protocol.
//!
//! Items are split into at most `workers` contiguous chunks; each chunk goes
//! to its own child process running the current executable with
//! [`WORKER_FLAG`]. The channel is JSON lines over stdin/stdout:
//!
//! ```text
//! parent -> child   {"kind":"assess","task":{...}}     header
//! parent -> child   <input>                             one per line
//! child  -> parent  <output>                            one per line, same order
//! ```
//!
//! A library host only gets worker processes of its own executable after
//! calling [`enable_current_exe_workers`]. Children carry [`WORKER_ENV`] and
//! refuse to start workers of their own.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, BufWriter, Lines, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use super::{panic_message, AssessTask, EngineError, Probe, Task};

/// Command-line flag that turns the binary into a worker process.
pub const WORKER_FLAG: &str = "--engine-worker";

/// Set on every worker child. A process that has it never spawns workers.
pub const WORKER_ENV: &str = "VICTIMATOR_ENGINE_WORKER";

static CURRENT_EXE_SERVES_WORKERS: AtomicBool = AtomicBool::new(false);

/// Declares that the running executable routes [`WORKER_FLAG`] to
/// [`serve_worker`] before doing anything else.
///
/// Until this is called, [`ProcessPoolEngine::for_current_exe`] is unavailable.
pub fn enable_current_exe_workers() {
    CURRENT_EXE_SERVES_WORKERS.store(true, Ordering::SeqCst);
}

fn inside_worker() -> bool {
    std::env::var_os(WORKER_ENV).is_some()
}

#[derive(Debug, Serialize, Deserialize)]
struct WorkerHeader {
    kind: String,
    task: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessPoolEngine {
    workers: usize,
    program: PathBuf,
}

impl ProcessPoolEngine {
    /// `program` must serve [`serve_worker`] when started with [`WORKER_FLAG`].
    pub fn new(workers: usize, program: impl Into<PathBuf>) -> Self {
        Self {
            workers: workers.max(1),
            program: program.into(),
        }
    }

    /// Uses the running executable as the worker program.
    ///
    /// The host binary must hand stdin/stdout to [`serve_worker`] when its
    /// first argument is [`WORKER_FLAG`]. It opts in with
    /// [`enable_current_exe_workers`].
    ///
    /// # Errors
    ///
    /// [`EngineError::Unavailable`] when the host has not opted in.
    pub fn for_current_exe(workers: usize) -> Result<Self, EngineError> {
        if !CURRENT_EXE_SERVES_WORKERS.load(Ordering::SeqCst) {
            return Err(EngineError::Unavailable("parallel"));
        }
        let program = std::env::current_exe().map_err(EngineError::Spawn)?;
        Ok(Self::new(workers, program))
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn apply<K: Task>(&self, task: &K, items: &[K::Input]) -> Result<Vec<K::Output>, EngineError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        if inside_worker() {
            return Err(EngineError::Unavailable("parallel"));
        }

        let header = serde_json::to_string(&WorkerHeader {
            kind: K::KIND.to_string(),
            task: serde_json::to_value(task)?,
        })?;
        let chunk_size = items.len().div_ceil(self.workers);

        let outcomes = thread::scope(|scope| {
            let handles: Vec<_> = items
                .chunks(chunk_size)
                .map(|chunk| {
                    let header = header.as_str();
                    scope.spawn(move || self.run_chunk::<K>(header, chunk))
                })
                .collect();
            handles.into_iter().map(|h| h.join()).collect::<Vec<_>>()
        });

        let mut results = Vec::with_capacity(items.len());
        for outcome in outcomes {
            let chunk = outcome.map_err(|payload| EngineError::WorkerPanicked(panic_message(payload)))??;
            results.extend(chunk);
        }
        Ok(results)
    }

    fn run_chunk<K: Task>(&self, header: &str, chunk: &[K::Input]) -> Result<Vec<K::Output>, EngineError> {
        let mut child = Command::new(&self.program)
            .arg(WORKER_FLAG)
            .env(WORKER_ENV, "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(EngineError::Spawn)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Protocol("worker stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Protocol("worker stdout unavailable".to_string()))?;

        // Writing runs beside reading so neither pipe can fill up and stall.
        let (written, read) = thread::scope(|scope| {
            let writer = scope.spawn(move || write_requests(stdin, header, chunk));
            let read = read_replies::<K::Output, _>(stdout);
            (writer.join(), read)
        });

        let status = child.wait()?;
        if !status.success() {
            return Err(EngineError::WorkerExited(status));
        }
        written.map_err(|payload| EngineError::WorkerPanicked(panic_message(payload)))??;

        let outputs = read?;
        if outputs.len() != chunk.len() {
            return Err(EngineError::Protocol(format!(
                "expected {} results from worker, got {}",
                chunk.len(),
                outputs.len()
            )));
        }
        Ok(outputs)
    }
}

fn write_requests<T: Serialize, W: Write>(sink: W, header: &str, chunk: &[T]) -> Result<(), EngineError> {
    let mut writer = BufWriter::new(sink);
    writeln!(writer, "{header}")?;
    for item in chunk {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads every reply line. Keeps draining after a bad line so the worker
/// never blocks on a full pipe; the first error wins.
fn read_replies<R: DeserializeOwned, S: Read>(source: S) -> Result<Vec<R>, EngineError> {
    let mut outputs = Vec::new();
    let mut first_error = None;
    for line in BufReader::new(source).lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                first_error.get_or_insert(EngineError::Io(err));
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(output) => outputs.push(output),
            Err(err) => {
                first_error.get_or_insert(EngineError::Codec(err));
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(outputs),
    }
}

/// Worker-process entry point: reads a header and inputs from `input`,
/// writes one output line per input to `output`.
///
/// Returns how many items were served.
pub fn serve_worker<R: BufRead, W: Write>(input: R, output: W) -> Result<usize, EngineError> {
    let mut lines = input.lines();
    let header_line = lines
        .next()
        .ok_or_else(|| EngineError::Protocol("missing worker header".to_string()))??;
    let header: WorkerHeader = serde_json::from_str(&header_line)?;

    if header.kind == AssessTask::KIND {
        serve_task::<AssessTask, _, _>(header.task, lines, output)
    } else if header.kind == Probe::KIND {
        serve_task::<Probe, _, _>(header.task, lines, output)
    } else {
        Err(EngineError::Protocol(format!(
            "unknown task kind '{}'",
            header.kind
        )))
    }
}

fn serve_task<K: Task, R: BufRead, W: Write>(
    payload: serde_json::Value,
    lines: Lines<R>,
    output: W,
) -> Result<usize, EngineError> {
    let task: K = serde_json::from_value(payload)?;
    let mut writer = BufWriter::new(output);
    let mut served = 0;

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let input: K::Input = serde_json::from_str(&line)?;
        serde_json::to_writer(&mut writer, &task.run(&input))?;
        writer.write_all(b"\n")?;
        served += 1;
    }

    writer.flush()?;
    Ok(served)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::AssessmentContext;
    use crate::model::PasswordAssessment;
    use crate::tokens::normalize_tokens;
    use std::io::Cursor;

    fn request<K: Task>(task: &K, items: &[K::Input]) -> Vec<u8> {
        let header = serde_json::to_string(&WorkerHeader {
            kind: K::KIND.to_string(),
            task: serde_json::to_value(task).unwrap(),
        })
        .unwrap();
        let mut buffer = Vec::new();
        write_requests(&mut buffer, &header, items).unwrap();
        buffer
    }

    #[test]
    fn test_serve_worker_probe() {
        let input = request(&Probe, &[1, 2, 3]);
        let mut output = Vec::new();

        let served = serve_worker(Cursor::new(input), &mut output).unwrap();
        assert_eq!(served, 3);

        let replies: Vec<i64> = read_replies(Cursor::new(output)).unwrap();
        assert_eq!(replies, vec![2, 4, 6]);
    }

    #[test]
    fn test_serve_worker_assessments_round_trip() {
        let task = AssessTask::new(AssessmentContext::new(normalize_tokens(["river"]), 12));
        let items = vec!["password".to_string(), "River2024!".to_string()];
        let mut output = Vec::new();

        serve_worker(Cursor::new(request(&task, &items)), &mut output).unwrap();

        let replies: Vec<PasswordAssessment> = read_replies(Cursor::new(output)).unwrap();
        let expected: Vec<PasswordAssessment> = items.iter().map(|i| task.run(i)).collect();
        assert_eq!(replies, expected);
    }

    #[test]
    fn test_serve_worker_unknown_kind() {
        let input = b"{\"kind\":\"mystery\",\"task\":null}\n".to_vec();
        let result = serve_worker(Cursor::new(input), Vec::<u8>::new());
        assert!(matches!(result, Err(EngineError::Protocol(_))));
    }

    #[test]
    fn test_serve_worker_missing_header() {
        let result = serve_worker(Cursor::new(Vec::<u8>::new()), Vec::<u8>::new());
        assert!(matches!(result, Err(EngineError::Protocol(_))));
    }

    #[test]
    fn test_read_replies_reports_bad_line() {
        let result: Result<Vec<i64>, _> = read_replies(Cursor::new(b"2\nnot-json\n6\n".to_vec()));
        assert!(matches!(result, Err(EngineError::Codec(_))));
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let engine = ProcessPoolEngine::new(2, "/nonexistent/victimator-worker");
        let result = engine.apply(&Probe, &[1, 2]);
        assert!(matches!(result, Err(EngineError::Spawn(_))));
    }
}
