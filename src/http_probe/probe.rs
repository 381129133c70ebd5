use serde_json::Value;

use super::prelude::*;

impl From<TransportError> for ProbeError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => ProbeError::Timeout,
            TransportError::Connect(details) => ProbeError::Connection(details),
            TransportError::Other(details) => ProbeError::Transport(details),
        }
    }
}

/// Issues single requests against a fixed base URL and captures the outcome.
///
/// A probe never returns an error and never panics on network trouble: every
/// failure ends up in [`ProbeOutcome::Failed`].
#[derive(Debug)]
pub struct Prober<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> Prober<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Appends `path` to the base URL verbatim.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `method` to `path`. The payload is only sent with POST.
    pub async fn probe(&self, method: &str, path: &str, payload: Option<&Value>) -> ProbeOutcome {
        let method = match method.parse::<HttpMethod>() {
            Ok(method) => method,
            Err(err) => {
                log::debug!("Refusing to probe {path}: {err}");
                return ProbeOutcome::Failed(err);
            }
        };

        let url = self.url_for(path);
        let json_body = match method {
            HttpMethod::Post => payload.cloned(),
            _ => None,
        };

        log::debug!("Probing {method} {url}");

        match self
            .transport
            .send(TransportRequest {
                method,
                url: url.clone(),
                json_body,
            })
            .await
        {
            Ok(response) => {
                log::debug!(
                    "{method} {url} answered {} in {:.3}s",
                    response.status,
                    response.elapsed.as_secs_f64()
                );
                ProbeOutcome::Reached(ProbeResponse {
                    status_code: response.status,
                    headers: response.headers,
                    elapsed: response.elapsed,
                    body: ResponseBody::decode(&response.body),
                })
            }
            Err(err) => {
                let err = ProbeError::from(err);
                log::debug!("{method} {url} failed: {err}");
                ProbeOutcome::Failed(err)
            }
        }
    }
}
