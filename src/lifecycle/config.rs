//! # Configuration
//!
//! Environment-driven settings for the storefront.
//!
//! | Variable | Default |
//! |---|---|
//! | `CATALOG_BASE_URL` | `https://dummyjson.com/` |
//! | `CATALOG_TIMEOUT_SECS` | unset (no transport timeout) |
//! | `CATALOG_USER_AGENT` | `storefront-core/<version>` |
//! | `QUERY_CHANNEL_CAPACITY` | `32` |
//!
//! [`StorefrontConfig::from_env`] reads an optional `.env` file first, so local
//! overrides work without exporting anything. Empty values count as unset.

use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com/";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

// Parsed on first use; covered by `test_defaults`.
static DEFAULT_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is an absolute http(s) url")
});

const BASE_URL_VAR: &str = "CATALOG_BASE_URL";
const TIMEOUT_VAR: &str = "CATALOG_TIMEOUT_SECS";
const USER_AGENT_VAR: &str = "CATALOG_USER_AGENT";
const CAPACITY_VAR: &str = "QUERY_CHANNEL_CAPACITY";

/// Invalid configuration. Every variant names the offending variable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid url {value:?}: {source}")]
    InvalidUrl {
        var: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{var}: {value:?} cannot be used as a base url")]
    NotABase { var: &'static str, value: String },

    #[error("{var}: invalid number {value:?}: {source}")]
    InvalidNumber {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{var}: must be greater than zero")]
    Zero { var: &'static str },
}

/// Runtime settings for the catalog transport and the cache actors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Always ends with `/`, so endpoint paths join beneath it.
    pub base_url: Url,
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
    pub channel_capacity: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: None,
            user_agent: default_user_agent(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl StorefrontConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is the normal case in production.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let base_url = match read(BASE_URL_VAR) {
            Some(value) => parse_base_url(BASE_URL_VAR, &value)?,
            None => default_base_url(),
        };

        let request_timeout = read(TIMEOUT_VAR)
            .map(|value| parse_positive::<u64>(TIMEOUT_VAR, &value))
            .transpose()?
            .map(Duration::from_secs);

        let user_agent = read(USER_AGENT_VAR).unwrap_or_else(default_user_agent);

        let channel_capacity = read(CAPACITY_VAR)
            .map(|value| parse_positive::<usize>(CAPACITY_VAR, &value))
            .transpose()?
            .unwrap_or(DEFAULT_CHANNEL_CAPACITY);

        Ok(Self {
            base_url,
            request_timeout,
            user_agent,
            channel_capacity,
        })
    }
}

fn default_base_url() -> Url {
    DEFAULT_URL.clone()
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn parse_base_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::NotABase {
            var,
            value: value.to_string(),
        });
    }
    ensure_trailing_slash(&mut url);
    Ok(url)
}

fn ensure_trailing_slash(url: &mut Url) {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
}

fn parse_positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = ParseIntError> + Default + PartialEq,
{
    match value.parse::<T>() {
        Ok(n) if n == T::default() => Err(ConfigError::Zero { var }),
        Ok(n) => Ok(n),
        Err(source) => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert!(!config.base_url.cannot_be_a_base());
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.channel_capacity, 32);
        assert!(config.user_agent.starts_with("storefront-core/"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CATALOG_BASE_URL", "http://127.0.0.1:8080/api"),
            ("CATALOG_TIMEOUT_SECS", "5"),
            ("CATALOG_USER_AGENT", "kiosk/2"),
            ("QUERY_CHANNEL_CAPACITY", "4"),
        ])
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8080/api/");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.user_agent, "kiosk/2");
        assert_eq!(config.channel_capacity, 4);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("CATALOG_TIMEOUT_SECS", "  "), ("CATALOG_USER_AGENT", "")])
            .unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = config_from(&[("CATALOG_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: "CATALOG_TIMEOUT_SECS", .. }));
        assert!(err.to_string().starts_with("CATALOG_TIMEOUT_SECS"));

        let err = config_from(&[("QUERY_CHANNEL_CAPACITY", "0")]).unwrap_err();
        assert_eq!(err, ConfigError::Zero { var: "QUERY_CHANNEL_CAPACITY" });

        let err = config_from(&[("CATALOG_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { var: "CATALOG_BASE_URL", .. }));

        let err = config_from(&[("CATALOG_BASE_URL", "mailto:shop@example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::NotABase { .. }));
    }
}
