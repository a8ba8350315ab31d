//! Running external programs with line-by-line output forwarding.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read};
use std::process::{Command, ExitStatus, Stdio};

use crossbeam::channel::{self, Sender};
use relkit_core::{Error, Result, StepContext};

/// Lines of stderr kept for the error message of a failed command.
const STDERR_TAIL: usize = 20;

/// How a finished process ended.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub status: ExitStatus,
    pub stderr_tail: Vec<String>,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Turns a non-zero exit into [`Error::CommandFailed`].
    pub fn check(self, ctx: &StepContext<'_>, command: &str) -> Result<()> {
        if self.success() {
            return Ok(());
        }
        Err(Error::CommandFailed {
            task: ctx.task().to_string(),
            command: command.to_string(),
            status: describe_status(&self.status),
            detail: if self.stderr_tail.is_empty() {
                String::new()
            } else {
                format!("\n{}", self.stderr_tail.join("\n"))
            },
        })
    }
}

/// Spawns `command` in the project root and waits for it.
///
/// Both output streams are read on helper threads and merged through a
/// channel, so lines reach the reporter in arrival order from this thread.
/// With `stream` unset, lines are only logged at trace level.
pub fn run_process(
    ctx: &StepContext<'_>,
    mut command: Command,
    display: &str,
    stream: bool,
) -> Result<ProcessOutcome> {
    let program = command.get_program().to_string_lossy().to_string();
    let mut child = command
        .current_dir(ctx.root())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            task: ctx.task().to_string(),
            program,
            source,
        })?;

    let shown = display;
    tracing::debug!("spawned {} for {}", shown, ctx.task());

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (tx, rx) = channel::unbounded::<(String, bool)>();
    let mut stderr_tail = VecDeque::with_capacity(STDERR_TAIL);

    std::thread::scope(|scope| {
        if let Some(stdout) = stdout {
            let tx = tx.clone();
            scope.spawn(move || forward_lines(stdout, false, &tx));
        }
        if let Some(stderr) = stderr {
            let tx = tx.clone();
            scope.spawn(move || forward_lines(stderr, true, &tx));
        }
        drop(tx);

        for (line, is_stderr) in rx.iter() {
            if is_stderr {
                if stderr_tail.len() == STDERR_TAIL {
                    stderr_tail.pop_front();
                }
                stderr_tail.push_back(line.clone());
            }
            if stream {
                ctx.emit(&line, is_stderr);
            } else {
                tracing::trace!("[{}] {}", ctx.task(), line);
            }
        }
    });

    let status = child.wait().map_err(|e| Error::io(ctx.root(), e))?;

    Ok(ProcessOutcome {
        status,
        stderr_tail: stderr_tail.into_iter().collect(),
    })
}

fn forward_lines<R: Read>(reader: R, is_stderr: bool, tx: &Sender<(String, bool)>) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
                if tx.send((line.to_string(), is_stderr)).is_err() {
                    break;
                }
            }
        }
    }
}

fn describe_status(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
