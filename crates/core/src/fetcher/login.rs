//! Login capability: a credential pair contributed to a fetcher.

use crate::config::FetchConfig;

use super::{FetcherError, OptionSet, OptionSpec, OptionValue};

/// Credentials for a tracker account. Both fields stay optional until login
/// time: composing the capability does not require them, using it does.
#[derive(Debug, Clone, Default)]
pub struct LoginCapability {
    user: Option<String>,
    passwd: Option<String>,
}

impl LoginCapability {
    pub fn new(user: Option<String>, passwd: Option<String>) -> Self {
        Self { user, passwd }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            user: config.user.clone(),
            passwd: config.passwd.clone(),
        }
    }

    /// Both credentials, or an authentication error naming the missing one.
    pub fn credentials(&self, site: &str) -> Result<(&str, &str), FetcherError> {
        let user = self
            .user
            .as_deref()
            .ok_or_else(|| FetcherError::auth(format!("Required user for {site}")))?;
        let passwd = self
            .passwd
            .as_deref()
            .ok_or_else(|| FetcherError::auth(format!("Required passwd for {site}")))?;
        Ok((user, passwd))
    }

    /// Options contributed by this capability.
    pub fn options() -> OptionSet {
        OptionSet::new(vec![
            OptionSpec::new("user", OptionValue::Str(None), "Site login"),
            OptionSpec::secret("passwd", OptionValue::Str(None), "Site password"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_present() {
        let login = LoginCapability::new(Some("alice".into()), Some("secret".into()));
        assert_eq!(login.credentials("tracker").unwrap(), ("alice", "secret"));
    }

    #[test]
    fn test_missing_user_is_auth_error() {
        let login = LoginCapability::new(None, Some("secret".into()));
        let err = login.credentials("tracker").unwrap_err();
        assert!(matches!(err, FetcherError::Auth(msg) if msg == "Required user for tracker"));
    }

    #[test]
    fn test_missing_passwd_is_auth_error() {
        let login = LoginCapability::new(Some("alice".into()), None);
        let err = login.credentials("tracker").unwrap_err();
        assert!(matches!(err, FetcherError::Auth(msg) if msg == "Required passwd for tracker"));
    }

    #[test]
    fn test_passwd_option_is_secret() {
        let options = LoginCapability::options();
        let passwd = options
            .specs()
            .iter()
            .find(|spec| spec.name == "passwd")
            .unwrap();
        assert!(passwd.secret);
    }
}
