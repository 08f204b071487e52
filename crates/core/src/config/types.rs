use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Per-tracker fetcher configuration, keyed by fetcher name.
    #[serde(default)]
    pub fetchers: HashMap<String, FetchConfig>,
}

impl Config {
    /// Configuration for a named fetcher, falling back to all defaults when
    /// the section is absent.
    pub fn fetcher(&self, name: &str) -> FetchConfig {
        self.fetchers.get(name).cloned().unwrap_or_default()
    }
}

/// Per-fetcher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Retry budget for tracker-specific HTTP errors.
    #[serde(default = "default_url_retries")]
    pub url_retries: u32,
    /// Sleep interval between retries, in seconds.
    #[serde(default = "default_url_sleep_time")]
    pub url_sleep_time: f64,
    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    /// User-agent presented to the site.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Client identity reported to the tracker.
    #[serde(default = "default_client_agent")]
    pub client_agent: String,
    /// Scheme-prefixed proxy address (http://, socks4://, socks5://).
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// Site login (only used by fetchers with the login capability).
    #[serde(default)]
    pub user: Option<String>,
    /// Site password.
    #[serde(default)]
    pub passwd: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url_retries: default_url_retries(),
            url_sleep_time: default_url_sleep_time(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            client_agent: default_client_agent(),
            proxy_url: None,
            user: None,
            passwd: None,
        }
    }
}

impl FetchConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    pub fn sleep_duration(&self) -> Duration {
        Duration::from_secs_f64(self.url_sleep_time)
    }
}

fn default_url_retries() -> u32 {
    10
}

fn default_url_sleep_time() -> f64 {
    1.0
}

fn default_timeout() -> f64 {
    10.0
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_client_agent() -> String {
    "rtorrent/0.9.2/0.13.2".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.url_retries, 10);
        assert!((config.url_sleep_time - 1.0).abs() < f64::EPSILON);
        assert!((config.timeout - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.user_agent, "Mozilla/5.0");
        assert_eq!(config.client_agent, "rtorrent/0.9.2/0.13.2");
        assert!(config.proxy_url.is_none());
        assert!(config.user.is_none());
        assert!(config.passwd.is_none());
    }

    #[test]
    fn test_fetcher_lookup_falls_back_to_defaults() {
        let config = Config::default();
        let fetch = config.fetcher("rutracker");
        assert_eq!(fetch.url_retries, 10);
    }

    #[test]
    fn test_durations() {
        let config = FetchConfig {
            timeout: 2.5,
            url_sleep_time: 0.25,
            ..Default::default()
        };
        assert_eq!(config.timeout_duration(), Duration::from_millis(2500));
        assert_eq!(config.sleep_duration(), Duration::from_millis(250));
    }
}
