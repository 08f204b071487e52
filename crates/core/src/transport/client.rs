//! HTTP client construction and the reqwest-backed transport.

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Client, Proxy};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{read_with_retry, Method, RetryPolicy, Transport, TransportError, TransportRequest};

/// Build an HTTP client with an optional cookie store and an optional proxy.
///
/// Proxy scheme dispatch: `http` routes both http and https traffic through
/// the given proxy, `socks4`/`socks5` tunnel through a SOCKS handler, any
/// other scheme fails without building a client.
pub fn build_client(
    jar: Option<Arc<Jar>>,
    proxy_url: Option<&str>,
    timeout: Duration,
) -> Result<Client, TransportError> {
    let mut builder = Client::builder().timeout(timeout);

    if let Some(jar) = jar {
        builder = builder.cookie_provider(jar);
    }

    if let Some(proxy_url) = proxy_url {
        let scheme = reqwest::Url::parse(proxy_url)
            .map(|u| u.scheme().to_ascii_lowercase())
            .unwrap_or_default();
        match scheme.as_str() {
            "http" | "socks4" | "socks5" => {
                let proxy = Proxy::all(proxy_url)
                    .map_err(|e| TransportError::InvalidProxy(e.to_string()))?;
                builder = builder.proxy(proxy);
            }
            other => return Err(TransportError::InvalidProxy(other.to_string())),
        }
    }

    builder
        .build()
        .map_err(|e| TransportError::Client(e.to_string()))
}

/// Reqwest-backed transport: one request per attempt, bounded retry per the
/// policy, default `User-Agent` applied when the request carries none.
pub struct HttpTransport {
    client: Client,
    policy: RetryPolicy,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(client: Client, policy: RetryPolicy, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            policy,
            user_agent: user_agent.into(),
        }
    }

    async fn attempt(&self, request: &TransportRequest) -> Result<Vec<u8>, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        if request.header_value("user-agent").is_none() {
            builder = builder.header("User-Agent", self.user_agent.as_str());
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let preview: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect();
            return Err(TransportError::Status {
                status: status.as_u16(),
                preview,
            });
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: TransportRequest) -> Result<Vec<u8>, TransportError> {
        debug!(method = ?request.method, url = %request.url, "issuing request");
        read_with_retry(&self.policy, || self.attempt(&request)).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::ConnectionFailed(err.to_string())
    } else {
        TransportError::Client(err.to_string())
    }
}
