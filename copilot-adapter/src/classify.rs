//! Plain-text error heuristics for Copilot CLI output.
//!
//! The CLI reports several failures as prose, sometimes with a zero exit
//! status. [`classify`] is the only place these patterns live. Matching is
//! ASCII case-insensitive over the full combined output and the first rule
//! that matches wins.

use thiserror::Error;

/// Message used when an `error:` line carries no text.
pub const GENERIC_ERROR_MESSAGE: &str = "Copilot CLI reported an error";

const AUTH_PATTERNS: [&str; 2] = ["no authentication", "not authenticated"];
const RATE_LIMIT_PATTERNS: [&str; 2] = ["rate limit", "too many requests"];
const NETWORK_PATTERNS: [&str; 2] = ["network error", "connection refused"];
const ERROR_PREFIX: &str = "error:";

/// A failure recognized from the CLI's plain-text output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error(
        "Copilot CLI is not authenticated. Run `copilot` and use /login, \
         or set GH_TOKEN or GITHUB_TOKEN to a token with Copilot access."
    )]
    Authentication,

    #[error("Copilot CLI rate limit exceeded. Wait a moment and try again.")]
    RateLimit,

    #[error("Copilot CLI could not reach the network. Check your connection and proxy settings.")]
    Network,

    /// The text after an `error:` marker.
    #[error("{0}")]
    Reported(String),
}

/// Recognizes a known plain-text failure in `output`.
#[must_use]
pub fn classify(output: &str) -> Option<TextError> {
    // ASCII lowering keeps byte offsets aligned with `output`.
    let lower = output.to_ascii_lowercase();
    let contains_any = |patterns: &[&str]| patterns.iter().any(|p| lower.contains(p));

    if contains_any(&AUTH_PATTERNS) {
        return Some(TextError::Authentication);
    }
    if contains_any(&RATE_LIMIT_PATTERNS) {
        return Some(TextError::RateLimit);
    }
    if contains_any(&NETWORK_PATTERNS) {
        return Some(TextError::Network);
    }

    if lower.trim_start().starts_with(ERROR_PREFIX) || lower.contains("\nerror:") {
        return Some(TextError::Reported(reported_message(output, &lower)));
    }

    None
}

/// Text after the first `error:` up to the end of that line.
fn reported_message(output: &str, lower: &str) -> String {
    let message = lower
        .find(ERROR_PREFIX)
        .map(|idx| {
            let rest = &output[idx + ERROR_PREFIX.len()..];
            rest.find('\n').map_or(rest, |end| &rest[..end]).trim()
        })
        .unwrap_or_default();

    if message.is_empty() {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        message.to_string()
    }
}
