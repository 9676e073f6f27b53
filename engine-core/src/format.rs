/// Maximum number of output characters quoted in an exit error.
pub const EXIT_EXCERPT_CHARS: usize = 500;

/// Builds the message for a CLI that exited unsuccessfully without a
/// recognizable error in its output.
///
/// The message always embeds the exit code (or the terminating signal) and
/// at most [`EXIT_EXCERPT_CHARS`] characters of the trimmed output.
#[must_use]
pub fn format_exit_error(
    engine: &str,
    exit_code: Option<i32>,
    signal: Option<i32>,
    output: &str,
) -> String {
    let status = match (exit_code, signal) {
        (Some(code), _) => format!("exited with code {code}"),
        (None, Some(sig)) => format!("was terminated by signal {sig}"),
        (None, None) => "exited with an unknown status".to_string(),
    };

    let trimmed = output.trim();
    let excerpt = if trimmed.is_empty() {
        "(no output)".to_string()
    } else {
        preview(trimmed, EXIT_EXCERPT_CHARS)
    };

    format!("{engine} {status}: {excerpt}")
}

/// Returns at most `max_chars` characters of `text`, marking the cut with `...`.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_error_contains_code_and_output() {
        let msg = format_exit_error("copilot", Some(127), None, "  command not found \n");
        assert_eq!(msg, "copilot exited with code 127: command not found");
    }

    #[test]
    fn exit_error_reports_signal_when_no_code() {
        let msg = format_exit_error("copilot", None, Some(9), "");
        assert_eq!(msg, "copilot was terminated by signal 9: (no output)");
    }

    #[test]
    fn exit_error_excerpt_is_bounded() {
        let output = "x".repeat(EXIT_EXCERPT_CHARS * 2);
        let msg = format_exit_error("copilot", Some(1), None, &output);
        assert!(msg.ends_with("..."));
        assert!(msg.len() < EXIT_EXCERPT_CHARS + 64);
    }

    #[test]
    fn preview_respects_char_boundaries() {
        assert_eq!(preview("héllo wörld", 4), "héll...");
        assert_eq!(preview("short", 10), "short");
    }
}
