//! Capability configuration option groups.
//!
//! Each capability declares its own named options; a fetcher's effective
//! schema is the merge of the groups of all composed capabilities. Merging
//! rejects name collisions at fetcher construction time rather than letting
//! one capability silently shadow another.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("Option name declared by more than one capability: {0}")]
    DuplicateName(String),
}

/// Default value and kind of a configuration option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Int(i64),
    Float(f64),
    Str(Option<&'static str>),
}

/// One named option contributed by a capability.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: &'static str,
    pub default: OptionValue,
    /// Secret values (passwords) must be redacted when the schema is shown.
    pub secret: bool,
    pub help: &'static str,
}

impl OptionSpec {
    pub fn new(name: &'static str, default: OptionValue, help: &'static str) -> Self {
        Self {
            name,
            default,
            secret: false,
            help,
        }
    }

    pub fn secret(name: &'static str, default: OptionValue, help: &'static str) -> Self {
        Self {
            name,
            default,
            secret: true,
            help,
        }
    }
}

/// An ordered group of option specs contributed by one capability.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    specs: Vec<OptionSpec>,
}

impl OptionSet {
    pub fn new(specs: Vec<OptionSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.iter().any(|spec| spec.name == name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Merge capability option groups into one fetcher schema, erroring on the
/// first name contributed by more than one group.
pub fn merge_option_sets(
    sets: impl IntoIterator<Item = OptionSet>,
) -> Result<OptionSet, OptionsError> {
    let mut merged = OptionSet::default();
    for set in sets {
        for spec in set.specs {
            if merged.contains(spec.name) {
                return Err(OptionsError::DuplicateName(spec.name.to_string()));
            }
            merged.specs.push(spec);
        }
    }
    Ok(merged)
}

/// Options contributed by the base fetch capability.
pub fn base_options() -> OptionSet {
    OptionSet::new(vec![
        OptionSpec::new(
            "url_retries",
            OptionValue::Int(10),
            "The number of retries to handle tracker-specific HTTP errors",
        ),
        OptionSpec::new(
            "url_sleep_time",
            OptionValue::Float(1.0),
            "Sleep interval between the retries",
        ),
        OptionSpec::new("timeout", OptionValue::Float(10.0), "Timeout for HTTP client"),
        OptionSpec::new(
            "user_agent",
            OptionValue::Str(Some("Mozilla/5.0")),
            "User-agent for site",
        ),
        OptionSpec::new(
            "client_agent",
            OptionValue::Str(Some("rtorrent/0.9.2/0.13.2")),
            "User-agent for tracker",
        ),
        OptionSpec::new(
            "proxy_url",
            OptionValue::Str(None),
            "The URL of the HTTP proxy",
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_options_names() {
        let options = base_options();
        for name in [
            "url_retries",
            "url_sleep_time",
            "timeout",
            "user_agent",
            "client_agent",
            "proxy_url",
        ] {
            assert!(options.contains(name), "missing {name}");
        }
        assert_eq!(options.len(), 6);
    }

    #[test]
    fn test_merge_disjoint_sets() {
        let extra = OptionSet::new(vec![OptionSpec::new(
            "user",
            OptionValue::Str(None),
            "Site login",
        )]);
        let merged = merge_option_sets([base_options(), extra]).unwrap();
        assert!(merged.contains("url_retries"));
        assert!(merged.contains("user"));
        assert_eq!(merged.len(), 7);
    }

    #[test]
    fn test_merge_rejects_collision() {
        let colliding = OptionSet::new(vec![OptionSpec::new(
            "timeout",
            OptionValue::Float(5.0),
            "A conflicting timeout",
        )]);
        let result = merge_option_sets([base_options(), colliding]);
        assert_eq!(
            result.unwrap_err(),
            OptionsError::DuplicateName("timeout".to_string())
        );
    }

    #[test]
    fn test_merge_preserves_order() {
        let a = OptionSet::new(vec![OptionSpec::new("a", OptionValue::Int(1), "")]);
        let b = OptionSet::new(vec![OptionSpec::new("b", OptionValue::Int(2), "")]);
        let merged = merge_option_sets([a, b]).unwrap();
        let names: Vec<_> = merged.specs().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
