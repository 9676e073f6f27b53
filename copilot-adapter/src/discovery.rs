//! Locates the Copilot CLI binary on the system.

use crate::error::CopilotError;
use std::path::PathBuf;
use which::which;

/// Command name the Copilot CLI installs under.
pub const COPILOT_COMMAND: &str = "copilot";

/// Environment variable that overrides the default Copilot CLI binary path.
pub const COPILOT_BIN_ENV_VAR: &str = "COPILOT_ADAPTER_BIN";

/// Locates the Copilot CLI executable.
///
/// Resolution order:
/// 1. `explicit_path` if provided and the file exists.
/// 2. The path in the `COPILOT_ADAPTER_BIN` environment variable.
/// 3. `copilot` resolved via `$PATH`.
/// 4. Common npm install locations (platform-specific).
/// 5. Helpful error with install instructions.
///
/// # Errors
///
/// Returns `CopilotError::ExecutableNotFound` when no valid executable can be
/// located.
pub fn discover_copilot(explicit_path: Option<PathBuf>) -> Result<PathBuf, CopilotError> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Ok(path);
        }
        return Err(CopilotError::ExecutableNotFound(format!(
            "Explicit path does not exist: {}",
            path.display()
        )));
    }

    if let Ok(path_str) = std::env::var(COPILOT_BIN_ENV_VAR) {
        let path = PathBuf::from(path_str);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Ok(path) = which(COPILOT_COMMAND) {
        return Ok(path);
    }

    if let Some(location) = fallback_locations().into_iter().find(|p| p.exists()) {
        return Ok(location);
    }

    Err(CopilotError::ExecutableNotFound(
        "copilot not found. Install: npm install -g @github/copilot\n\
         Searched: PATH, common install locations."
            .to_string(),
    ))
}

#[cfg(unix)]
fn fallback_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".npm-global/bin/copilot"));
        locations.push(home.join(".local/bin/copilot"));
    }
    locations.push(PathBuf::from("/usr/local/bin/copilot"));
    locations.push(PathBuf::from("/opt/homebrew/bin/copilot"));
    locations
}

#[cfg(windows)]
fn fallback_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    // npm global shims live under roaming AppData
    if let Some(data) = dirs::data_dir() {
        locations.push(data.join("npm").join("copilot.cmd"));
    }
    locations
}
