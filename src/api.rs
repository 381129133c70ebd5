//! Typed views of the JSON documents the sticker server returns.
//!
//! Only used to enrich the report. A body that does not match is simply ignored.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::http_probe::prelude::ResponseBody;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
    pub agents: Option<Agents>,
    pub islamic_compliance: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Agents {
    pub prompt_agent: String,
    pub image_agent: String,
    pub save_agent: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestResponse {
    pub status: String,
    pub message: String,
    pub timestamp: Option<String>,
    pub cors: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExamplesResponse {
    pub textual_examples: Vec<String>,
    pub visual_examples: Vec<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StickerResponse {
    pub success: bool,
    pub message: String,
    pub image_url: Option<String>,
    pub generation_time: Option<f64>,
}

/// Error document returned with 4xx/5xx statuses. Servers disagree on the field name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    pub detail: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .or(self.message.as_deref())
            .or(self.error.as_deref())
    }
}

/// Decode a JSON body into `T`, or `None` for text bodies and mismatched documents.
pub fn decode<T: DeserializeOwned>(body: &ResponseBody) -> Option<T> {
    let value = body.as_json()?;
    serde_json::from_value(value.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_health() {
        let body = ResponseBody::Json(json!({
            "status": "healthy",
            "version": "2.1.0",
            "agents": {"prompt_agent": "ready", "image_agent": "ready", "save_agent": "ready"},
            "islamic_compliance": "enabled"
        }));

        let health: HealthResponse = decode(&body).expect("health document");
        assert_eq!(health.status, "healthy");
        assert_eq!(health.version.as_deref(), Some("2.1.0"));
        assert_eq!(health.agents.map(|a| a.image_agent), Some("ready".to_string()));
    }

    #[test]
    fn test_decode_rejects_text_and_mismatches() {
        assert_eq!(decode::<HealthResponse>(&ResponseBody::Text("ok".into())), None);
        assert_eq!(decode::<HealthResponse>(&ResponseBody::Json(json!({"ok": true}))), None);
    }

    #[test]
    fn test_error_message_precedence() {
        let body: ApiErrorBody =
            decode(&ResponseBody::Json(json!({"message": "busy", "error": "E42"}))).expect("error body");
        assert_eq!(body.message(), Some("busy"));

        let body: ApiErrorBody = decode(&ResponseBody::Json(json!({"detail": "Not Found"}))).expect("error body");
        assert_eq!(body.message(), Some("Not Found"));

        let body: ApiErrorBody = decode(&ResponseBody::Json(json!({}))).expect("error body");
        assert_eq!(body.message(), None);
    }
}
