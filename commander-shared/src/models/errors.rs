//! The backend's error envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error envelope produced by the backend (`{"detail": ...}`).
///
/// `detail` is usually a human readable string, but request validation
/// failures carry a list of field errors instead, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ErrorBody {
    /// A message string or a list of field errors.
    #[serde(default)]
    pub detail: Value,
}

impl ErrorBody {
    /// Creates an error body with a plain message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            detail: Value::String(message.into()),
        }
    }

    /// Flattens `detail` into a single line suitable for display.
    ///
    /// Field-level validation entries are rendered as `loc: msg` and joined
    /// with `; `.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.detail {
            Value::String(text) => text.clone(),
            Value::Array(entries) => entries
                .iter()
                .map(|entry| {
                    let msg = entry.get("msg").and_then(Value::as_str).unwrap_or_default();
                    let location = entry
                        .get("loc")
                        .and_then(Value::as_array)
                        .and_then(|parts| parts.last())
                        .map(|part| match part {
                            Value::String(field) => field.clone(),
                            other => other.to_string(),
                        });
                    match location {
                        Some(field) => format!("{field}: {msg}"),
                        None => msg.to_string(),
                    }
                })
                .collect::<Vec<_>>()
                .join("; "),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Best-effort decoding of a response body; non-JSON bodies become the detail text.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self::new(body.trim()))
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_returned_verbatim() {
        let body = ErrorBody::from_body(r#"{"detail":"Benutzer ist deaktiviert"}"#);
        assert_eq!(body.message(), "Benutzer ist deaktiviert");
    }

    #[test]
    fn validation_list_is_flattened() {
        let json = r#"{"detail":[
            {"loc":["body","new_password"],"msg":"too short","type":"value_error"},
            {"loc":["body","confirm_password"],"msg":"mismatch","type":"value_error"}
        ]}"#;
        let body = ErrorBody::from_body(json);
        assert_eq!(body.message(), "new_password: too short; confirm_password: mismatch");
    }

    #[test]
    fn plain_text_body_becomes_detail() {
        let body = ErrorBody::from_body("  Bad Gateway \n");
        assert_eq!(body.to_string(), "Bad Gateway");
    }

    #[test]
    fn missing_detail_is_empty() {
        let body = ErrorBody::from_body("{}");
        assert_eq!(body.message(), "");
    }
}
