//! Utility functions and helpers

use serde_json::Value;

/// Placeholder printed instead of a newly applied value
pub const REDACTED: &str = "new content..(secret)";

/// Render a value that is about to be overwritten.
///
/// Strings are printed bare, everything else as compact JSON.
pub fn render_previous(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Short human-readable name of a value's type, used in error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_previous() {
        assert_eq!(render_previous(&json!("plain")), "plain");
        assert_eq!(render_previous(&json!(42)), "42");
        assert_eq!(render_previous(&json!(true)), "true");
        assert_eq!(render_previous(&Value::Null), "null");
        assert_eq!(render_previous(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(value_kind(&json!({})), "mapping");
        assert_eq!(value_kind(&json!([])), "array");
        assert_eq!(value_kind(&json!(1.5)), "number");
    }
}
