//! Detection of machine-readable error payloads in CLI output.
//!
//! Several CLIs print a JSON error object on a line of its own, sometimes
//! mixed into otherwise plain output. Any line that parses as a JSON object in
//! one of these shapes counts:
//!
//! - `{"type": "error", "message": "..."}`
//! - `{"error": "..."}` or `{"error": {"message": "..."}}`
//! - `{"is_error": true, "result": "..."}`

use serde_json::Value;

/// Returns the message of the first structured error payload in `output`.
#[must_use]
pub fn detect_structured_error(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let trimmed = line.trim();
        if !trimmed.starts_with('{') {
            return None;
        }
        let value: Value = serde_json::from_str(trimmed).ok()?;
        error_message(&value)
    })
}

fn error_message(value: &Value) -> Option<String> {
    let obj = value.as_object()?;

    if obj.get("is_error").and_then(Value::as_bool) == Some(true) {
        if let Some(msg) = obj.get("result").and_then(Value::as_str).and_then(non_empty) {
            return Some(msg);
        }
    }

    if obj.get("type").and_then(Value::as_str) == Some("error") {
        if let Some(msg) = obj.get("message").and_then(Value::as_str).and_then(non_empty) {
            return Some(msg);
        }
    }

    match obj.get("error")? {
        Value::String(msg) => non_empty(msg),
        Value::Object(inner) => inner
            .get("message")
            .and_then(Value::as_str)
            .and_then(non_empty),
        _ => None,
    }
}

fn non_empty(msg: &str) -> Option<String> {
    let trimmed = msg.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_typed_error_event() {
        let output = "starting\n{\"type\":\"error\",\"message\":\"quota exceeded\"}\n";
        assert_eq!(
            detect_structured_error(output).as_deref(),
            Some("quota exceeded")
        );
    }

    #[test]
    fn detects_nested_error_object() {
        let output = r#"{"error":{"code":400,"message":"bad request"}}"#;
        assert_eq!(detect_structured_error(output).as_deref(), Some("bad request"));
    }

    #[test]
    fn detects_result_flagged_as_error() {
        let output = r#"{"type":"result","is_error":true,"result":"Credit balance is too low"}"#;
        assert_eq!(
            detect_structured_error(output).as_deref(),
            Some("Credit balance is too low")
        );
    }

    #[test]
    fn ignores_plain_text_and_non_error_json() {
        assert!(detect_structured_error("Error: something broke").is_none());
        assert!(detect_structured_error(r#"{"type":"text","text":"hi"}"#).is_none());
        assert!(detect_structured_error(r#"{"error":null}"#).is_none());
        assert!(detect_structured_error("{not json").is_none());
    }
}
