//! Response extraction from raw Copilot CLI output.
//!
//! This is a heuristic tied to the CLI's current banner and status text.
//! Lines are dropped when they are:
//!
//! - blank
//! - interactive prompts (leading `?`)
//! - selection markers from the interactive banner (leading `❯`)
//! - spinner status text (`Thinking...`, `Working on it...`)
//! - the per-model token usage summary
//!
//! When the CLI changes its chrome these rules need updating; nothing else in
//! the adapter depends on them.

use crate::usage::is_usage_line;

/// Returned when no line survives filtering, so callers never see an empty
/// successful response.
pub const EMPTY_RESPONSE: &str = "Task completed";

const PROMPT_GLYPH: char = '❯';
const STATUS_MARKERS: [&str; 2] = ["Thinking...", "Working on it..."];

/// Extracts the human-readable response from combined CLI output.
#[must_use]
pub fn extract_response(output: &str) -> String {
    let kept: Vec<&str> = output.lines().filter(|line| is_content(line)).collect();

    if kept.is_empty() {
        EMPTY_RESPONSE.to_string()
    } else {
        kept.join("\n")
    }
}

fn is_content(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('?') || trimmed.starts_with(PROMPT_GLYPH) {
        return false;
    }
    if STATUS_MARKERS.iter().any(|marker| line.contains(marker)) {
        return false;
    }
    !is_usage_line(line)
}
