//! Upstream HTTP transport port.
//!
//! The inference adapter talks to the remote endpoint only through
//! [`UpstreamTransport`], so tests can swap in canned replies. The
//! production implementation is [`ReqwestTransport`].

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Raw upstream reply: status code and body text, undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failures that happen before an upstream status is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream request failed: {0}")]
    Request(String),
}

/// Port for issuing a single JSON POST to the upstream endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// POST `body` as JSON to `url` with `Authorization: Bearer <bearer_token>`,
    /// giving up after `timeout`.
    async fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<UpstreamResponse, TransportError>;
}

/// Production transport backed by one shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with its own connection pool.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("geneticllm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Request(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

fn classify(err: &reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Request(err.to_string())
    }
}

#[async_trait]
impl UpstreamTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<UpstreamResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(bearer_token)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| classify(&e, timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| classify(&e, timeout))?;

        Ok(UpstreamResponse { status, body })
    }
}

// ============================================================================
// Fake Transport for Testing
// ============================================================================

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// One request seen by [`FakeTransport`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub url: String,
        pub bearer_token: String,
        pub body: serde_json::Value,
        pub timeout: Duration,
    }

    /// A transport that records requests and answers every call with the
    /// same canned outcome.
    #[derive(Clone)]
    pub struct FakeTransport {
        outcome: Result<UpstreamResponse, TransportError>,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    impl FakeTransport {
        /// Answer with `status` and a raw body.
        pub fn replying(status: u16, body: impl Into<String>) -> Self {
            Self::with_outcome(Ok(UpstreamResponse::new(status, body)))
        }

        /// Answer with `status` and a JSON body.
        pub fn replying_json(status: u16, body: &serde_json::Value) -> Self {
            Self::replying(status, body.to_string())
        }

        /// Fail every call with a timeout.
        pub fn timing_out() -> Self {
            Self::with_outcome(Err(TransportError::Timeout(Duration::from_secs(180))))
        }

        pub fn with_outcome(outcome: Result<UpstreamResponse, TransportError>) -> Self {
            Self {
                outcome,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Requests received so far, in arrival order.
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        /// The most recent request, if any.
        pub fn last_request(&self) -> Option<RecordedRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl UpstreamTransport for FakeTransport {
        async fn post_json(
            &self,
            url: &str,
            bearer_token: &str,
            body: &serde_json::Value,
            timeout: Duration,
        ) -> Result<UpstreamResponse, TransportError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                url: url.to_string(),
                bearer_token: bearer_token.to_string(),
                body: body.clone(),
                timeout,
            });
            self.outcome.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upstream_response_success_range() {
        assert!(UpstreamResponse::new(200, "").is_success());
        assert!(UpstreamResponse::new(204, "").is_success());
        assert!(!UpstreamResponse::new(199, "").is_success());
        assert!(!UpstreamResponse::new(301, "").is_success());
        assert!(!UpstreamResponse::new(503, "").is_success());
    }

    #[test]
    fn test_transport_error_messages() {
        let err = TransportError::Timeout(Duration::from_secs(180));
        assert!(err.to_string().contains("timed out"));
        let err = TransportError::Request("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_reqwest_transport_creation() {
        assert!(ReqwestTransport::new().is_ok());
    }

    #[tokio::test]
    async fn test_fake_transport_records_requests() {
        let fake = FakeTransport::replying_json(200, &json!({"ok": true}));
        let body = json!({"inputs": "hello"});

        let response = fake
            .post_json("http://upstream/generate", "hf_token", &body, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"ok":true}"#);

        let recorded = fake.last_request().unwrap();
        assert_eq!(recorded.url, "http://upstream/generate");
        assert_eq!(recorded.bearer_token, "hf_token");
        assert_eq!(recorded.body, body);
        assert_eq!(recorded.timeout, Duration::from_secs(5));
        assert_eq!(fake.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_fake_transport_timeout() {
        let fake = FakeTransport::timing_out();
        let result = fake
            .post_json("http://upstream", "t", &json!({}), Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(TransportError::Timeout(_))));
    }
}
