//! rutracker.org fetcher.
//!
//! Composes the base fetch contract with login, captcha and session
//! capabilities, driven by scraping the tracker's HTML. The login flow may
//! take a captcha-solving detour: the challenge image URL, session token and
//! target field name are extracted from the login response and the solution
//! is resubmitted alongside the original credentials.

use async_trait::async_trait;
use regex_lite::Regex;
use std::sync::Arc;
use tracing::debug;

use crate::config::FetchConfig;
use crate::fetcher::{
    base_options, merge_option_sets, BencodeValidator, CaptchaSolver, Fetcher, FetcherError,
    LoginCapability, OptionSet, OptionsError, Session, Torrent, TorrentDataValidator,
};
use crate::transport::{
    build_client, HttpTransport, RetryPolicy, Transport, TransportRequest,
};

const SITE_URL: &str = "http://rutracker.org";
const LOGIN_URL: &str = "http://login.rutracker.org/forum/login.php";
const DOWNLOAD_URL: &str = "http://dl.rutracker.org/forum/dl.php";

/// The login form's literal submit value ("Вход" in cp1251).
const LOGIN_MARKER: &[u8] = b"\xc2\xf5\xee\xe4";

const SITE_FINGERPRINT: &str = "<link rel=\"shortcut icon\" \
    href=\"http://static.rutracker.org/favicon.ico\" type=\"image/x-icon\">";

/// The tracker serves 503 while hammered and intermittent 404 on dl.php.
const RETRY_CODES: [u16; 2] = [503, 404];

/// A captcha challenge extracted from a login response.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CaptchaChallenge {
    image_url: String,
    session_token: String,
    code_field: String,
}

/// rutracker.org integration.
pub struct RutrackerFetcher {
    config: FetchConfig,
    login: LoginCapability,
    captcha: Arc<dyn CaptchaSolver>,
    validator: Arc<dyn TorrentDataValidator>,
    session: Option<Session>,
}

impl RutrackerFetcher {
    /// Create the fetcher. Fails when the composed capabilities declare
    /// colliding option names.
    pub fn new(
        config: FetchConfig,
        captcha: Arc<dyn CaptchaSolver>,
    ) -> Result<Self, OptionsError> {
        Self::options()?;
        let login = LoginCapability::from_config(&config);
        Ok(Self {
            config,
            login,
            captcha,
            validator: Arc::new(BencodeValidator),
            session: None,
        })
    }

    /// The merged configuration schema of all composed capabilities.
    pub fn options() -> Result<OptionSet, OptionsError> {
        merge_option_sets([base_options(), LoginCapability::options()])
    }

    /// Replace the torrent payload validator.
    pub fn with_validator(mut self, validator: Arc<dyn TorrentDataValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Install a pre-built session instead of constructing one lazily.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// The session, if one has been constructed.
    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_config(&self.config).with_retry_codes(&RETRY_CODES)
    }

    fn session(&mut self) -> Result<&Session, FetcherError> {
        if self.session.is_none() {
            debug!("building rutracker session");
            let session = Session::new(&self.config, self.retry_policy())?;
            self.session = Some(session);
        }
        match &self.session {
            Some(session) => Ok(session),
            None => Err(FetcherError::logic("Session not initialized")),
        }
    }

    fn topic_id(&self, torrent: &Torrent) -> Result<String, FetcherError> {
        parse_topic_id(torrent.comment())
            .map(str::to_string)
            .ok_or_else(|| FetcherError::logic("No match with torrent"))
    }

    async fn read(&mut self, request: TransportRequest) -> Result<Vec<u8>, FetcherError> {
        let session = self.session()?;
        Ok(session.transport().request(request).await?)
    }

    async fn read_login(&mut self, form: &[(String, Vec<u8>)]) -> Result<String, FetcherError> {
        let request = TransportRequest::post(LOGIN_URL)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(encode_form(form));
        let bytes = self.read(request).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn fetch_hash(&mut self, torrent: &Torrent) -> Result<String, FetcherError> {
        let page = self
            .read(TransportRequest::get(torrent.comment()))
            .await?;
        let text = String::from_utf8_lossy(&page);
        parse_tor_hash(&text).ok_or_else(|| FetcherError::logic("Hash not found"))
    }
}

#[async_trait]
impl Fetcher for RutrackerFetcher {
    fn name(&self) -> &str {
        "rutracker"
    }

    fn version(&self) -> u32 {
        1
    }

    fn is_matched_for(&self, torrent: &Torrent) -> bool {
        parse_topic_id(torrent.comment()).is_some()
    }

    async fn is_torrent_changed(&mut self, torrent: &Torrent) -> Result<bool, FetcherError> {
        self.topic_id(torrent)?;
        let fetched = self.fetch_hash(torrent).await?;
        Ok(!torrent.hash_equals(&fetched))
    }

    async fn fetch_new_data(&mut self, torrent: &Torrent) -> Result<Vec<u8>, FetcherError> {
        let topic_id = self.topic_id(torrent)?;
        debug!(topic_id = %topic_id, "fetching torrent data");

        let data = {
            let session = self.session()?;
            // Single-use download cookie, scoped to the forum subtree. The
            // Domain attribute is required so the cookie also matches the
            // dl. subdomain the download request goes to.
            session.set_cookie(
                &format!("bb_dl={topic_id}; Domain=rutracker.org; Path=/forum/; HttpOnly"),
                SITE_URL,
            )?;

            let request = TransportRequest::post(format!("{DOWNLOAD_URL}?t={topic_id}"))
                .header(
                    "Referer",
                    format!("{SITE_URL}/forum/viewtopic.php?t={topic_id}"),
                )
                .header("Origin", SITE_URL)
                .body(Vec::new());
            session.transport().request(request).await?
        };

        if !self.validator.is_valid(&data) {
            let preview = String::from_utf8_lossy(&data[..data.len().min(20)])
                .escape_default()
                .to_string();
            return Err(FetcherError::logic(format!(
                "Received an invalid torrent data: {preview} ..."
            )));
        }
        Ok(data)
    }

    async fn test_site(&mut self) -> Result<(), FetcherError> {
        // Fresh cookie-less client so the probe does not disturb the session.
        let client = build_client(
            None,
            self.config.proxy_url.as_deref(),
            self.config.timeout_duration(),
        )?;
        let transport =
            HttpTransport::new(client, self.retry_policy(), self.config.user_agent.clone());

        let page = transport.request(TransportRequest::get(SITE_URL)).await?;
        if !String::from_utf8_lossy(&page).contains(SITE_FINGERPRINT) {
            return Err(FetcherError::site("rutracker.org fingerprint not found"));
        }
        Ok(())
    }

    async fn login(&mut self) -> Result<(), FetcherError> {
        let (user, passwd) = {
            let (user, passwd) = self.login.credentials("rutracker")?;
            (user.to_string(), passwd.to_string())
        };

        let mut form: Vec<(String, Vec<u8>)> = vec![
            ("login_username".to_string(), user.into_bytes()),
            ("login_password".to_string(), passwd.into_bytes()),
            ("login".to_string(), LOGIN_MARKER.to_vec()),
        ];

        let text = self.read_login(&form).await?;
        if let Some(challenge) = parse_captcha_challenge(&text)? {
            debug!(image_url = %challenge.image_url, "login challenged with captcha");
            let solution = self.captcha.solve(&challenge.image_url).await?;
            form.push((challenge.code_field, solution.into_bytes()));
            form.push(("cap_sid".to_string(), challenge.session_token.into_bytes()));

            let text = self.read_login(&form).await?;
            if has_captcha_marker(&text) {
                return Err(FetcherError::auth("Invalid captcha or password"));
            }
        }
        // No positive logged-in marker exists; absence of the captcha
        // marker is the only success signal.
        Ok(())
    }

    fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }
}

/// Extract the topic id from a torrent's comment URL.
fn parse_topic_id(comment: &str) -> Option<&str> {
    let re = Regex::new(r"^http://rutracker\.org/forum/viewtopic\.php\?t=(\d+)").unwrap();
    re.captures(comment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract the content fingerprint from a topic page, lowercased.
fn parse_tor_hash(page: &str) -> Option<String> {
    let re = Regex::new(r#"<span id="tor-hash">([a-zA-Z0-9]+)</span>"#).unwrap();
    re.captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

fn has_captcha_marker(page: &str) -> bool {
    let re = Regex::new(r#""(http://static\.rutracker\.org/captcha/[^"]+)""#).unwrap();
    re.is_match(page)
}

/// Extract the captcha challenge from a login response, if one is present.
/// A marker with a missing session token or code field is an auth error.
fn parse_captcha_challenge(page: &str) -> Result<Option<CaptchaChallenge>, FetcherError> {
    let static_re = Regex::new(r#""(http://static\.rutracker\.org/captcha/[^"]+)""#).unwrap();
    let Some(image) = static_re.captures(page) else {
        return Ok(None);
    };

    let sid_re = Regex::new(r#"name="cap_sid" value="([a-zA-Z0-9]+)""#).unwrap();
    let sid = sid_re
        .captures(page)
        .ok_or_else(|| FetcherError::auth("Unknown cap_sid"))?;

    let code_re = Regex::new(r#"name="(cap_code_[a-zA-Z0-9]+)""#).unwrap();
    let code = code_re
        .captures(page)
        .ok_or_else(|| FetcherError::auth("Unknown cap_code"))?;

    Ok(Some(CaptchaChallenge {
        image_url: image[1].to_string(),
        session_token: sid[1].to_string(),
        code_field: code[1].to_string(),
    }))
}

/// Percent-encode a form whose values are raw bytes (the login marker is
/// cp1251, everything else UTF-8).
fn encode_form(form: &[(String, Vec<u8>)]) -> Vec<u8> {
    form.iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode_binary(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
        .into_bytes()
}
