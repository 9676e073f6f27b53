//! Request and result types shared by every engine adapter.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single prompt execution request. Built fresh for every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Prompt text passed to the CLI.
    pub prompt: String,
    /// Directory the CLI runs in.
    pub work_dir: PathBuf,
    /// Optional model override.
    pub model: Option<String>,
    /// Raw arguments appended after the adapter's own flags.
    pub extra_args: Vec<String>,
}

impl InvocationRequest {
    /// Creates a request with no model override and no extra arguments.
    #[must_use]
    pub fn new(prompt: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompt: prompt.into(),
            work_dir: work_dir.into(),
            model: None,
            extra_args: Vec::new(),
        }
    }

    /// Sets the model override.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the extra CLI arguments.
    #[must_use]
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Normalized outcome of one engine call.
///
/// Failures always carry a non-empty `error`. Token counts default to zero
/// when the CLI reports no usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterResult {
    /// Whether the call produced a usable response.
    pub success: bool,
    /// Human-readable response text.
    pub response: String,
    /// Input tokens reported by the CLI.
    pub input_tokens: u64,
    /// Output tokens reported by the CLI.
    pub output_tokens: u64,
    /// Error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Cost or duration annotation, e.g. `duration:1234`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
}

impl AdapterResult {
    /// A successful result carrying `response`.
    #[must_use]
    pub fn success(response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: response.into(),
            ..Self::default()
        }
    }

    /// A failed result with an empty response.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Attaches response text (used for failures that still produced output).
    #[must_use]
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    /// Sets the input/output token counts.
    #[must_use]
    pub const fn with_tokens(mut self, input: u64, output: u64) -> Self {
        self.input_tokens = input;
        self.output_tokens = output;
        self
    }

    /// Sets the `duration:<ms>` annotation.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.cost = Some(format!("duration:{duration_ms}"));
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn result_serializes_with_camel_case_and_omits_absent_fields() {
        let result = AdapterResult::success("done")
            .with_tokens(10, 20)
            .with_duration_ms(42);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["inputTokens"], 10);
        assert_eq!(json["outputTokens"], 20);
        assert_eq!(json["cost"], "duration:42");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failure_has_empty_response_and_zero_tokens() {
        let result = AdapterResult::failure("boom");
        assert!(!result.success);
        assert!(result.response.is_empty());
        assert_eq!(result.input_tokens, 0);
        assert_eq!(result.output_tokens, 0);
        assert_eq!(result.error.as_deref(), Some("boom"));
    }

    #[test]
    fn request_builder_sets_optional_fields() {
        let request = InvocationRequest::new("hi", "/tmp")
            .with_model("gpt-5")
            .with_extra_args(["--allow-all-tools"]);
        assert_eq!(request.model.as_deref(), Some("gpt-5"));
        assert_eq!(request.extra_args, vec!["--allow-all-tools".to_string()]);
    }
}
