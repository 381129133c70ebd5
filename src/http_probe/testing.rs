//! Scripted transport for tests: canned responses keyed by method and URL, plus a call log.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::prelude::*;

type Scripted = Result<TransportResponse, TransportError>;

pub fn response(status: u16, body: &str) -> TransportResponse {
    TransportResponse {
        status,
        headers: Headers::new(),
        elapsed: Duration::from_millis(120),
        body: body.to_string(),
    }
}

impl TransportResponse {
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: HashMap<(HttpMethod, String), Scripted>,
    fallback: Option<Scripted>,
    calls: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request that has no route fails with `err`.
    pub fn failing_with(err: TransportError) -> Self {
        Self {
            fallback: Some(Err(err)),
            ..Self::default()
        }
    }

    /// Every request that has no route gets `response`.
    pub fn answering(response: TransportResponse) -> Self {
        Self {
            fallback: Some(Ok(response)),
            ..Self::default()
        }
    }

    pub fn respond(mut self, method: HttpMethod, url: &str, response: TransportResponse) -> Self {
        self.routes.insert((method, url.to_string()), Ok(response));
        self
    }

    pub fn fail(mut self, method: HttpMethod, url: &str, err: TransportError) -> Self {
        self.routes.insert((method, url.to_string()), Err(err));
        self
    }

    pub fn calls(&self) -> Vec<TransportRequest> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("call log poisoned").len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let key = (request.method, request.url.clone());
        self.calls.lock().expect("call log poisoned").push(request);

        match self.routes.get(&key).or(self.fallback.as_ref()) {
            Some(scripted) => scripted.clone(),
            None => Err(TransportError::Other(format!(
                "no scripted response for {} {}",
                key.0, key.1
            ))),
        }
    }
}
