//! Types for the retrying transport.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::config::FetchConfig;

/// Errors that can occur during transport operations.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Invalid proxy protocol: {0}")]
    InvalidProxy(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP {status}: {preview}")]
    Status { status: u16, preview: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Retry policy for a transport: attempt budget, fixed delay and the
/// predicate deciding which failures are worth another attempt.
///
/// The delay is deliberately fixed; there is no exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt.
    pub retries: u32,
    /// Fixed delay between attempts.
    pub sleep: Duration,
    /// HTTP status codes considered transient.
    pub retry_codes: Vec<u16>,
    /// Whether a request timeout is retried or propagated immediately.
    pub retry_on_timeout: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 10,
            sleep: Duration::from_secs(1),
            retry_codes: vec![500, 502, 503],
            retry_on_timeout: true,
        }
    }
}

impl RetryPolicy {
    /// Derive a policy from a fetcher configuration, keeping the default
    /// retryable status codes.
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            retries: config.url_retries,
            sleep: config.sleep_duration(),
            ..Default::default()
        }
    }

    /// Same policy with a different set of retryable status codes.
    pub fn with_retry_codes(mut self, codes: &[u16]) -> Self {
        self.retry_codes = codes.to_vec();
        self
    }

    /// Whether a failed attempt should be retried.
    ///
    /// Timeouts honor `retry_on_timeout`, HTTP statuses are checked against
    /// `retry_codes`, connection failures are always considered transient.
    pub fn should_retry(&self, err: &TransportError) -> bool {
        match err {
            TransportError::Timeout => self.retry_on_timeout,
            TransportError::Status { status, .. } => self.retry_codes.contains(status),
            TransportError::ConnectionFailed(_) => true,
            _ => false,
        }
    }
}

/// HTTP method for a transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single HTTP request as seen by the transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Value of the first header with the given name, case-insensitive.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A transport performing one logical read per call: issue the request,
/// retry transient failures per the policy, return the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: TransportRequest) -> Result<Vec<u8>, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 10);
        assert_eq!(policy.sleep, Duration::from_secs(1));
        assert_eq!(policy.retry_codes, vec![500, 502, 503]);
        assert!(policy.retry_on_timeout);
    }

    #[test]
    fn test_should_retry_status_codes() {
        let policy = RetryPolicy::default();
        let transient = TransportError::Status {
            status: 503,
            preview: String::new(),
        };
        let fatal = TransportError::Status {
            status: 404,
            preview: String::new(),
        };
        assert!(policy.should_retry(&transient));
        assert!(!policy.should_retry(&fatal));
    }

    #[test]
    fn test_should_retry_timeout() {
        let mut policy = RetryPolicy::default();
        assert!(policy.should_retry(&TransportError::Timeout));
        policy.retry_on_timeout = false;
        assert!(!policy.should_retry(&TransportError::Timeout));
    }

    #[test]
    fn test_invalid_proxy_never_retried() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(&TransportError::InvalidProxy("ftp".into())));
        assert!(!policy.should_retry(&TransportError::Client("boom".into())));
    }

    #[test]
    fn test_with_retry_codes() {
        let policy = RetryPolicy::default().with_retry_codes(&[503, 404]);
        let not_found = TransportError::Status {
            status: 404,
            preview: String::new(),
        };
        assert!(policy.should_retry(&not_found));
    }

    #[test]
    fn test_request_builders() {
        let request = TransportRequest::post("http://example.org/dl.php")
            .header("Referer", "http://example.org/topic")
            .body(b"".to_vec());
        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.header_value("referer"),
            Some("http://example.org/topic")
        );
        assert_eq!(request.body.as_deref(), Some(&b""[..]));
    }
}
