//! Turns a raw [`RunResult`] into the engine-level [`AdapterResult`].
//!
//! Decision order:
//! 1. timeout
//! 2. structured error payload
//! 3. plain-text patterns ([`classify`])
//! 4. non-zero exit or termination by signal
//! 5. success
//!
//! A zero exit status does not guarantee success; the CLI prints some
//! failures to normal output and still exits 0.

use crate::classify::classify;
use crate::extract::extract_response;
use crate::types::RunResult;
use crate::usage::parse_usage;
use cli_engine_core::{detect_structured_error, format_exit_error, AdapterResult};
use std::time::Duration;

/// Name used in exit-error messages.
const DISPLAY_NAME: &str = "Copilot CLI";

#[must_use]
pub fn normalize(run: &RunResult, timeout: Duration) -> AdapterResult {
    if run.timed_out {
        return AdapterResult::failure(timeout_message(timeout));
    }

    if let Some(message) = detect_structured_error(&run.output) {
        return AdapterResult::failure(message);
    }

    if let Some(error) = classify(&run.output) {
        return AdapterResult::failure(error.to_string());
    }

    let response = extract_response(&run.output);

    if !run.exited_cleanly() {
        let message = format_exit_error(DISPLAY_NAME, run.exit_code, run.signal, &run.output);
        return AdapterResult::failure(message).with_response(response);
    }

    let usage = parse_usage(&run.output);
    AdapterResult::success(response)
        .with_tokens(usage.input, usage.output)
        .with_duration_ms(run.duration_ms)
}

/// `Copilot CLI timed out after 5 minutes` for the default budget.
#[must_use]
pub fn timeout_message(timeout: Duration) -> String {
    let secs = timeout.as_secs();
    let span = match secs {
        60 => "1 minute".to_string(),
        s if s > 0 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s if s > 0 => format!("{s} seconds"),
        _ => format!("{} ms", timeout.as_millis()),
    };
    format!("{DISPLAY_NAME} timed out after {span}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_TIMEOUT;

    fn exited(code: i32, output: &str) -> RunResult {
        RunResult {
            output: output.to_string(),
            exit_code: Some(code),
            duration_ms: 1234,
            ..RunResult::default()
        }
    }

    #[test]
    fn timeout_takes_precedence_over_everything() {
        let run = RunResult {
            output: "model-x 1000 in, 500 out\nError: not authenticated\nreal text".to_string(),
            timed_out: true,
            ..RunResult::default()
        };
        let result = normalize(&run, DEFAULT_TIMEOUT);

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Copilot CLI timed out after 5 minutes")
        );
        assert!(result.response.is_empty());
        assert_eq!((result.input_tokens, result.output_tokens), (0, 0));
    }

    #[test]
    fn success_reports_tokens_and_duration() {
        let result = normalize(
            &exited(0, "model-x 1000 in, 500 out, 200 cached\nTask completed"),
            DEFAULT_TIMEOUT,
        );

        assert!(result.success);
        assert_eq!(result.response, "Task completed");
        assert_eq!(result.input_tokens, 1000);
        assert_eq!(result.output_tokens, 500);
        assert_eq!(result.cost.as_deref(), Some("duration:1234"));
        assert!(result.error.is_none());
    }

    #[test]
    fn bare_suffixed_input_count_is_parsed_and_hidden() {
        let result = normalize(&exited(0, "17.5k in\nTask completed"), DEFAULT_TIMEOUT);
        assert!(result.success);
        assert_eq!(result.input_tokens, 17_500);
        assert_eq!(result.response, "Task completed");

        let result = normalize(&exited(0, "model-x 500 out, 1.5m in\nok"), DEFAULT_TIMEOUT);
        assert_eq!(result.input_tokens, 1_500_000);
        assert_eq!(result.output_tokens, 500);
        assert_eq!(result.response, "ok");
    }

    #[test]
    fn authentication_failure_on_stderr() {
        let result = normalize(&exited(1, "Error: No authentication found"), DEFAULT_TIMEOUT);
        let error = result.error.unwrap();

        assert!(!result.success);
        assert!(error.contains("not authenticated"), "got: {error}");
        assert!(error.contains("/login"), "got: {error}");
        assert!(result.response.is_empty());
    }

    #[test]
    fn structured_error_wins_over_text_patterns() {
        let output = "rate limit warning\n{\"type\":\"error\",\"message\":\"model disabled by policy\"}";
        let result = normalize(&exited(0, output), DEFAULT_TIMEOUT);
        assert_eq!(result.error.as_deref(), Some("model disabled by policy"));
    }

    #[test]
    fn zero_exit_with_error_text_is_a_failure() {
        let result = normalize(&exited(0, "Thinking...\nerror: tool execution denied"), DEFAULT_TIMEOUT);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("tool execution denied"));
    }

    #[test]
    fn non_zero_exit_embeds_code_and_keeps_response() {
        let result = normalize(&exited(127, "partial answer"), DEFAULT_TIMEOUT);

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("127"));
        assert_eq!(result.response, "partial answer");
    }

    #[test]
    fn signal_without_exit_code_is_a_failure() {
        let run = RunResult {
            output: "half".to_string(),
            signal: Some(9),
            ..RunResult::default()
        };
        let result = normalize(&run, DEFAULT_TIMEOUT);
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("signal 9"));
    }

    #[test]
    fn timeout_message_formats_span() {
        assert_eq!(timeout_message(Duration::from_secs(60)), "Copilot CLI timed out after 1 minute");
        assert_eq!(timeout_message(Duration::from_secs(90)), "Copilot CLI timed out after 90 seconds");
        assert_eq!(timeout_message(Duration::from_millis(500)), "Copilot CLI timed out after 500 ms");
    }
}
