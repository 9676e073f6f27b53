//! Subprocess execution for the Copilot CLI.
//!
//! ## Completion contract
//!
//! A run is finished when the child process exits, not when its output pipes
//! reach EOF. The Copilot CLI can leave stdout/stderr open after it is done
//! (background helpers inherit the descriptors), so waiting for EOF would
//! hang. Instead the executor awaits the exit status, gives the reader tasks
//! a short bounded window to hand over whatever is already buffered, and then
//! aborts them. From the caller's side this is one awaited call that always
//! returns within `timeout` plus the shutdown grace period.

use crate::cmd::BuiltCommand;
use crate::error::CopilotError;
use crate::types::{CopilotConfig, RunResult};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, warn};

const CHANNEL_CAPACITY: usize = 100;
const GRACE_PERIOD: Duration = Duration::from_secs(5);
/// Longest a single line may grow before it is split.
const MAX_LINE_BYTES: u64 = 1024 * 1024;
/// Post-exit drain: stop after this long without a new line...
const DRAIN_IDLE: Duration = Duration::from_millis(250);
/// ...or after this long in total.
const DRAIN_LIMIT: Duration = Duration::from_secs(2);

/// Runs `command` in `work_dir` and captures its combined output.
///
/// Exceeding `config.timeout` is not an error: the child is terminated and
/// the result comes back with `timed_out` set.
///
/// # Errors
/// Returns a [`CopilotError`] if the process cannot be spawned or waited on.
pub async fn run_copilot(
    command: &BuiltCommand,
    work_dir: &Path,
    config: &CopilotConfig,
) -> Result<RunResult, CopilotError> {
    let start_time = Instant::now();
    let mut child = spawn_child(command, work_dir)?;

    let stdout = child.stdout.take().ok_or(CopilotError::NoStdout)?;
    let stderr = child.stderr.take().ok_or(CopilotError::NoStderr)?;
    let pid = child.id().ok_or(CopilotError::NoPid)?;
    debug!(pid, "Copilot CLI spawned");

    // Both streams feed one channel so the combined output keeps arrival order.
    let (line_tx, mut line_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
    let mut readers = JoinSet::new();
    readers.spawn(forward_lines(stdout, line_tx.clone()));
    readers.spawn(forward_lines(stderr, line_tx));

    let mut output = CombinedOutput::new(config.max_output_bytes);

    let waited = timeout(config.timeout, async {
        loop {
            tokio::select! {
                Some(line) = line_rx.recv() => output.push(line),
                status = child.wait() => break status,
            }
        }
    })
    .await;

    let (status, timed_out) = match waited {
        Ok(status) => {
            let status = status.map_err(|e| CopilotError::SpawnFailed {
                stage: "wait for child".to_string(),
                source: e,
            })?;
            (Some(status), false)
        }
        Err(_elapsed) => {
            debug!(pid, timeout = ?config.timeout, "Copilot CLI timed out, terminating");
            if let Err(e) = graceful_shutdown(&mut child, pid).await {
                warn!(pid, error = %e, "Failed to terminate timed-out Copilot CLI");
            }
            (None, true)
        }
    };
    let duration = start_time.elapsed();

    drain_after_exit(&mut line_rx, &mut output).await;
    readers.abort_all();
    while readers.join_next().await.is_some() {}

    if output.truncated {
        warn!(
            pid,
            limit_bytes = config.max_output_bytes,
            "Copilot CLI output exceeded the cap and was truncated"
        );
    }

    Ok(RunResult {
        output: output.lines.join("\n"),
        exit_code: status.and_then(|s| s.code()),
        signal: status.and_then(exit_signal),
        duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        timed_out,
        truncated: output.truncated,
    })
}

/// Spawns the child with piped stdout/stderr and no stdin.
fn spawn_child(command: &BuiltCommand, work_dir: &Path) -> Result<Child, CopilotError> {
    let mut cmd = match command {
        BuiltCommand::Argv { program, args } => {
            let mut cmd = Command::new(program);
            cmd.args(args);
            cmd
        }
        BuiltCommand::Shell { shell, line } => shell_command(shell, line),
    };

    if !work_dir.as_os_str().is_empty() {
        cmd.current_dir(work_dir);
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    cmd.spawn().map_err(|e| CopilotError::SpawnFailed {
        stage: "spawn subprocess".to_string(),
        source: e,
    })
}

#[cfg(windows)]
fn shell_command(shell: &std::ffi::OsStr, line: &str) -> Command {
    let mut cmd = Command::new(shell);
    // `/s` makes cmd strip exactly the outer quotes and run the rest verbatim.
    cmd.raw_arg("/d /s /c").raw_arg(format!("\"{line}\""));
    cmd
}

#[cfg(not(windows))]
fn shell_command(shell: &std::ffi::OsStr, line: &str) -> Command {
    let mut cmd = Command::new(shell);
    cmd.arg("-c").arg(line);
    cmd
}

/// Reads `stream` line by line and forwards each line until EOF, a read
/// error, or the receiver going away.
async fn forward_lines(stream: impl AsyncRead + Unpin, tx: mpsc::Sender<String>) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match (&mut reader).take(MAX_LINE_BYTES).read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(&['\n', '\r'][..])
                    .to_string();
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Collects lines already written before exit without waiting for EOF.
async fn drain_after_exit(rx: &mut mpsc::Receiver<String>, output: &mut CombinedOutput) {
    let _ = timeout(DRAIN_LIMIT, async {
        while let Ok(Some(line)) = timeout(DRAIN_IDLE, rx.recv()).await {
            output.push(line);
        }
    })
    .await;
}

/// Combined stdout+stderr lines, bounded to a byte budget.
struct CombinedOutput {
    lines: Vec<String>,
    bytes: usize,
    limit: usize,
    truncated: bool,
}

impl CombinedOutput {
    const fn new(limit: usize) -> Self {
        Self {
            lines: Vec::new(),
            bytes: 0,
            limit,
            truncated: false,
        }
    }

    /// Kept lines always form an unbroken prefix of what arrived.
    fn push(&mut self, line: String) {
        if self.truncated {
            return;
        }
        // +1 for the newline the line is joined with.
        let needed = line.len() + 1;
        if self.bytes + needed > self.limit {
            self.truncated = true;
            return;
        }
        self.bytes += needed;
        self.lines.push(line);
    }
}

#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
const fn exit_signal(_status: ExitStatus) -> Option<i32> {
    None
}

/// Graceful shutdown: `SIGTERM`, wait grace period, then `SIGKILL`.
#[cfg(unix)]
async fn graceful_shutdown(child: &mut Child, pid: u32) -> Result<(), CopilotError> {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let raw_pid = i32::try_from(pid).map_err(|_| CopilotError::SignalFailed {
        signal: "SIGTERM".to_string(),
        pid,
        source: nix::errno::Errno::ESRCH,
    })?;

    signal::kill(Pid::from_raw(raw_pid), Signal::SIGTERM).map_err(|e| {
        CopilotError::SignalFailed {
            signal: "SIGTERM".to_string(),
            pid,
            source: e,
        }
    })?;

    match timeout(GRACE_PERIOD, child.wait()).await {
        Ok(Ok(_status)) => Ok(()),
        Ok(Err(e)) => Err(CopilotError::SpawnFailed {
            stage: "graceful_shutdown wait".to_string(),
            source: e,
        }),
        Err(_) => {
            child.kill().await.map_err(|e| CopilotError::SpawnFailed {
                stage: "SIGKILL".to_string(),
                source: e,
            })?;
            Ok(())
        }
    }
}

/// Windows: immediate termination, no graceful shutdown for console processes.
#[cfg(windows)]
async fn graceful_shutdown(child: &mut Child, _pid: u32) -> Result<(), CopilotError> {
    child.kill().await.map_err(|e| CopilotError::SpawnFailed {
        stage: "TerminateProcess".to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_output_stops_at_the_cap() {
        let mut output = CombinedOutput::new(10);
        output.push("12345".to_string());
        output.push("678".to_string());
        output.push("this one does not fit".to_string());

        assert_eq!(output.lines, vec!["12345", "678"]);
        assert!(output.truncated);
        assert_eq!(output.bytes, 10);
    }

    #[test]
    fn combined_output_keeps_no_lines_after_an_overflow() {
        let mut output = CombinedOutput::new(10);
        output.push("12345".to_string());
        output.push("too long line".to_string());
        output.push("ab".to_string());

        assert_eq!(output.lines, vec!["12345"]);
        assert!(output.truncated);
        assert_eq!(output.bytes, 6);
    }
}
