//! Opener/session capability: an HTTP client bound to a cookie store.

use reqwest::cookie::{CookieStore, Jar};
use std::sync::Arc;

use crate::config::FetchConfig;
use crate::transport::{build_client, HttpTransport, RetryPolicy, Transport, TransportError};

/// One fetcher instance's HTTP session: a retrying transport over a client
/// whose cookie store lives for the fetcher's lifetime. Constructed lazily
/// on first need and never shared between fetcher instances.
pub struct Session {
    jar: Arc<Jar>,
    transport: Arc<dyn Transport>,
}

impl Session {
    /// Build a session from the fetcher configuration.
    pub fn new(config: &FetchConfig, policy: RetryPolicy) -> Result<Self, TransportError> {
        let jar = Arc::new(Jar::default());
        let client = build_client(
            Some(jar.clone()),
            config.proxy_url.as_deref(),
            config.timeout_duration(),
        )?;
        let transport = Arc::new(HttpTransport::new(
            client,
            policy,
            config.user_agent.clone(),
        ));
        Ok(Self { jar, transport })
    }

    /// Session over an externally provided transport. The cookie jar is
    /// still owned by the session so protocol code can set cookies.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            jar: Arc::new(Jar::default()),
            transport,
        }
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Store a `Set-Cookie` style string against the given URL.
    pub fn set_cookie(&self, cookie: &str, url: &str) -> Result<(), TransportError> {
        let url = reqwest::Url::parse(url).map_err(|e| TransportError::Client(e.to_string()))?;
        self.jar.add_cookie_str(cookie, &url);
        Ok(())
    }

    /// The `Cookie` header value this session would send to `url`, if any.
    pub fn cookies_for(&self, url: &str) -> Option<String> {
        let url = reqwest::Url::parse(url).ok()?;
        self.jar
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(String::from))
    }
}
