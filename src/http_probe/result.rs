use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Response headers keyed by lowercase header name.
pub type Headers = BTreeMap<String, String>;

/// Maximum number of characters kept from a body that is not valid JSON.
pub const TEXT_SNAPSHOT_CHARS: usize = 200;

/// Why a probe did not produce a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The requested method is not one the prober knows how to send.
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    /// No response arrived within the configured timeout.
    #[error("Timeout")]
    Timeout,

    /// DNS, TCP or TLS failure while connecting.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Anything else the transport reported.
    #[error("{0}")]
    Transport(String),
}

/// The decoded body of a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// Leading characters of a body that did not parse as JSON.
    Text(String),
}

impl ResponseBody {
    /// Decodes a raw body: empty bodies yield `None`, JSON is parsed, and anything else
    /// is kept as a bounded text snapshot.
    pub fn decode(raw: &str) -> Option<ResponseBody> {
        if raw.is_empty() {
            return None;
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Some(ResponseBody::Json(value)),
            Err(_) => Some(ResponseBody::Text(
                raw.chars().take(TEXT_SNAPSHOT_CHARS).collect(),
            )),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }
}

/// Everything captured from a response that arrived, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResponse {
    pub status_code: u16,
    pub headers: Headers,
    pub elapsed: Duration,
    pub body: Option<ResponseBody>,
}

impl ProbeResponse {
    /// True for 2xx statuses. Reaching the server is not the same as the endpoint being healthy.
    pub fn is_healthy(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// The result of one probe.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Reached(ProbeResponse),
    Failed(ProbeError),
}

impl ProbeOutcome {
    /// True when any response was received, including 4xx and 5xx.
    pub fn success(&self) -> bool {
        matches!(self, ProbeOutcome::Reached(_))
    }

    pub fn response(&self) -> Option<&ProbeResponse> {
        match self {
            ProbeOutcome::Reached(response) => Some(response),
            ProbeOutcome::Failed(_) => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.response().map(|r| r.status_code)
    }

    pub fn headers(&self) -> Option<&Headers> {
        self.response().map(|r| &r.headers)
    }

    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.response().map(|r| r.elapsed.as_secs_f64())
    }

    pub fn body(&self) -> Option<&ResponseBody> {
        self.response().and_then(|r| r.body.as_ref())
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match self {
            ProbeOutcome::Reached(_) => None,
            ProbeOutcome::Failed(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_empty_body_is_absent() {
        assert_eq!(ResponseBody::decode(""), None);
    }

    #[test]
    fn test_decode_json_body() {
        let body = ResponseBody::decode(r#"{"ok":true}"#);
        assert_eq!(body, Some(ResponseBody::Json(json!({"ok": true}))));
    }

    #[test]
    fn test_decode_text_body_is_truncated_by_characters() {
        let raw = "é".repeat(600);
        let Some(ResponseBody::Text(text)) = ResponseBody::decode(&raw) else {
            panic!("expected a text snapshot");
        };
        assert_eq!(text.chars().count(), TEXT_SNAPSHOT_CHARS);
        assert!(raw.starts_with(&text));
    }

    #[test]
    fn test_decode_short_text_body_is_kept_whole() {
        assert_eq!(
            ResponseBody::decode("<html>nope</html>"),
            Some(ResponseBody::Text("<html>nope</html>".to_string()))
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let reached = ProbeOutcome::Reached(ProbeResponse {
            status_code: 503,
            headers: Headers::from([("server".to_string(), "nginx".to_string())]),
            elapsed: Duration::from_millis(250),
            body: None,
        });
        assert!(reached.success());
        assert_eq!(reached.status_code(), Some(503));
        assert_eq!(reached.elapsed_seconds(), Some(0.25));
        assert_eq!(reached.headers().and_then(|h| h.get("server")).map(String::as_str), Some("nginx"));
        assert!(reached.error().is_none());
        assert!(!reached.response().is_some_and(ProbeResponse::is_healthy));

        let failed = ProbeOutcome::Failed(ProbeError::Timeout);
        assert!(!failed.success());
        assert_eq!(failed.status_code(), None);
        assert_eq!(failed.headers(), None);
        assert_eq!(failed.elapsed_seconds(), None);
        assert_eq!(failed.error().map(ToString::to_string), Some("Timeout".to_string()));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ProbeError::UnsupportedMethod("PATCH".into()).to_string(),
            "Unsupported method: PATCH"
        );
        assert_eq!(
            ProbeError::Connection("refused".into()).to_string(),
            "Connection error: refused"
        );
        assert_eq!(ProbeError::Transport("boom".into()).to_string(), "boom");
    }
}
