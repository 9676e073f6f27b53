use crate::cmd::CommandStyle;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Wall-clock budget for a single Copilot run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Cap on combined stdout+stderr kept from a single run.
pub const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024; // 10 MB

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopilotConfig {
    /// Executable to run. `None` uses the bare `copilot` command name.
    pub binary_path: Option<PathBuf>,
    pub timeout: Duration,
    pub max_output_bytes: usize,
    /// How the command line is handed to the OS.
    pub style: CommandStyle,
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            timeout: DEFAULT_TIMEOUT,
            max_output_bytes: MAX_OUTPUT_BYTES,
            style: CommandStyle::native(),
        }
    }
}

/// Raw outcome of one subprocess execution, before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Stdout and stderr lines in arrival order, joined with `\n`.
    pub output: String,
    pub exit_code: Option<i32>,
    /// Signal that terminated the process, if any (Unix only).
    pub signal: Option<i32>,
    pub duration_ms: u64,
    pub timed_out: bool,
    /// Set when output past the byte cap was dropped.
    pub truncated: bool,
}

impl RunResult {
    #[must_use]
    pub const fn exited_cleanly(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Token counts scraped from the CLI's usage summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
    pub cached: u64,
}
