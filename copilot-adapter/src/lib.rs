//! Engine adapter for the GitHub Copilot CLI.
//!
//! Runs `copilot --yolo -p <prompt>` as a subprocess and normalizes what it
//! prints into a [`cli_engine_core::AdapterResult`]. The CLI has no
//! machine-readable output mode for this, so success, errors, token usage and
//! the response text are all scraped from its combined stdout/stderr.

#![warn(clippy::pedantic)]
pub mod classify;
pub mod cmd;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod outcome;
pub mod process;
pub mod types;
pub mod usage;

use async_trait::async_trait;
use cli_engine_core::{preview, AdapterResult, Engine, InvocationRequest};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, warn};

pub use classify::{classify, TextError};
pub use cmd::{build_command, BuiltCommand, CommandStyle};
pub use discovery::{discover_copilot, COPILOT_BIN_ENV_VAR, COPILOT_COMMAND};
pub use error::CopilotError;
pub use extract::extract_response;
pub use process::run_copilot;
pub use types::*;

/// Identifier the adapter registers under.
pub const ENGINE_NAME: &str = "copilot";

const PREVIEW_CHARS: usize = 200;

/// The Copilot CLI engine. Holds only immutable configuration, so one
/// instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct CopilotAdapter {
    program: PathBuf,
    config: CopilotConfig,
}

impl CopilotAdapter {
    /// Uses `config.binary_path`, or the bare `copilot` command name
    /// resolved by the OS at spawn time.
    #[must_use]
    pub fn new(config: CopilotConfig) -> Self {
        let program = config
            .binary_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(COPILOT_COMMAND));
        Self { program, config }
    }

    /// Resolves the executable up front via [`discover_copilot`].
    ///
    /// # Errors
    /// Returns `CopilotError::ExecutableNotFound` if no executable is found.
    pub fn discover(config: CopilotConfig) -> Result<Self, CopilotError> {
        let program = discover_copilot(config.binary_path.clone())?;
        Ok(Self { program, config })
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub const fn config(&self) -> &CopilotConfig {
        &self.config
    }

    /// Checks if the Copilot CLI is working correctly.
    ///
    /// # Errors
    /// Returns an error if the binary cannot be executed or fails its own health check.
    pub async fn check_health(&self) -> Result<(), CopilotError> {
        let output = Command::new(&self.program).arg("--version").output().await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(CopilotError::HealthCheck(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }

    #[must_use]
    pub fn build_command(&self, request: &InvocationRequest) -> BuiltCommand {
        build_command(self.config.style, &self.program, request)
    }

    /// Runs the CLI and returns the raw, unclassified result.
    ///
    /// # Errors
    /// Returns a [`CopilotError`] if the process cannot be spawned or waited on.
    pub async fn run(&self, request: &InvocationRequest) -> Result<RunResult, CopilotError> {
        let command = self.build_command(request);
        run_copilot(&command, &request.work_dir, &self.config).await
    }
}

#[async_trait]
impl Engine for CopilotAdapter {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    async fn execute(&self, request: &InvocationRequest) -> AdapterResult {
        debug!(
            work_dir = %request.work_dir.display(),
            prompt_len = request.prompt.len(),
            prompt_preview = %preview(&request.prompt, PREVIEW_CHARS),
            model = ?request.model,
            "Running Copilot CLI"
        );

        match self.run(request).await {
            Ok(run) => {
                debug!(
                    exit_code = ?run.exit_code,
                    duration_ms = run.duration_ms,
                    timed_out = run.timed_out,
                    output_preview = %preview(&run.output, PREVIEW_CHARS),
                    "Copilot CLI finished"
                );
                outcome::normalize(&run, self.config.timeout)
            }
            Err(e) => {
                warn!(error = %e, program = %self.program.display(), "Copilot CLI invocation failed");
                AdapterResult::failure(e.to_string())
            }
        }
    }
}
