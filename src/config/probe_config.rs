use serde_json::{Value, json};

pub const HEALTH_PATH: &str = "/health";
pub const TEST_PATH: &str = "/test";
pub const EXAMPLES_PATH: &str = "/examples";
pub const GENERATE_STICKER_PATH: &str = "/generate-sticker";

/// Label of the OPTIONS step; its outcome decides whether CORS is reported as supported.
pub const CORS_LABEL: &str = "CORS Options";

/// One step of a run: a labelled request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeTarget {
    /// Name shown in the summary.
    pub label: String,

    /// Request method as written; unsupported methods fail without a request.
    pub method: String,

    /// Appended verbatim to the base URL.
    pub path: String,

    /// JSON body, only sent with POST.
    pub payload: Option<Value>,
}

impl ProbeTarget {
    pub fn new(label: &str, method: &str, path: &str) -> Self {
        Self {
            label: label.to_string(),
            method: method.to_string(),
            path: path.to_string(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// The seven checks run against the sticker server, in order.
pub fn default_plan() -> Vec<ProbeTarget> {
    vec![
        ProbeTarget::new("Base URL", "GET", "/"),
        ProbeTarget::new("Health", "GET", HEALTH_PATH),
        ProbeTarget::new("Test", "GET", TEST_PATH),
        ProbeTarget::new("Examples", "GET", EXAMPLES_PATH),
        ProbeTarget::new(CORS_LABEL, "OPTIONS", GENERATE_STICKER_PATH),
        ProbeTarget::new("Head Request", "HEAD", GENERATE_STICKER_PATH),
        ProbeTarget::new("Sticker Generation", "POST", GENERATE_STICKER_PATH).with_payload(json!({
            "phrase": "bismillah",
            "username": "test_user",
        })),
    ]
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_default_plan_order() {
        let plan = default_plan();
        let steps: Vec<(&str, &str, &str)> = plan
            .iter()
            .map(|t| (t.label.as_str(), t.method.as_str(), t.path.as_str()))
            .collect();

        assert_eq!(
            steps,
            vec![
                ("Base URL", "GET", "/"),
                ("Health", "GET", "/health"),
                ("Test", "GET", "/test"),
                ("Examples", "GET", "/examples"),
                ("CORS Options", "OPTIONS", "/generate-sticker"),
                ("Head Request", "HEAD", "/generate-sticker"),
                ("Sticker Generation", "POST", "/generate-sticker"),
            ]
        );
    }

    #[test]
    fn test_only_sticker_generation_carries_a_payload() {
        let plan = default_plan();
        let with_payload: Vec<&ProbeTarget> = plan.iter().filter(|t| t.payload.is_some()).collect();

        assert_eq!(with_payload.len(), 1);
        assert_eq!(
            with_payload[0].payload,
            Some(json!({"phrase": "bismillah", "username": "test_user"}))
        );
    }
}
