use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopilotError {
    #[error("Copilot executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("Failed to spawn process at stage '{stage}': {source}")]
    SpawnFailed {
        stage: String,
        #[source]
        source: std::io::Error,
    },

    #[cfg(unix)]
    #[error("Failed to send signal {signal} to PID {pid}: {source}")]
    SignalFailed {
        signal: String,
        pid: u32,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("Child process stdout was not captured")]
    NoStdout,

    #[error("Child process stderr was not captured")]
    NoStderr,

    #[error("Could not get PID from child process")]
    NoPid,

    #[error("Copilot health check failed: {0}")]
    HealthCheck(String),
}

// Manual From implementation for io::Error
impl From<std::io::Error> for CopilotError {
    fn from(error: std::io::Error) -> Self {
        Self::SpawnFailed {
            stage: "unknown".to_string(),
            source: error,
        }
    }
}
