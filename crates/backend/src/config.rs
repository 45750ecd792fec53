use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const URL_VAR: &str = "CODDY_SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "CODDY_SUPABASE_ANON_KEY";
pub const SERVICE_ROLE_KEY_VAR: &str = "CODDY_SUPABASE_SERVICE_ROLE_KEY";
pub const TIMEOUT_VAR: &str = "CODDY_HTTP_TIMEOUT_SECS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid project url: {raw}")]
    InvalidUrl { raw: String },

    #[error("invalid CODDY_HTTP_TIMEOUT_SECS value: {raw}")]
    InvalidTimeout { raw: String },
}

/// Endpoint and keys of the hosted project.
#[derive(Clone)]
pub struct BackendConfig {
    url: Url,
    anon_key: String,
    service_role_key: Option<String>,
    timeout: Option<Duration>,
}

impl BackendConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` for non-http(s) or unparsable urls and
    /// `ConfigError::Missing` for a blank key.
    pub fn new(url: &str, anon_key: impl Into<String>) -> Result<Self, ConfigError> {
        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(ConfigError::Missing(ANON_KEY_VAR));
        }
        Ok(Self {
            url: parse_base_url(url)?,
            anon_key: anon_key.trim().to_owned(),
            service_role_key: None,
            timeout: None,
        })
    }

    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = non_blank(URL_VAR).ok_or(ConfigError::Missing(URL_VAR))?;
        let anon_key = non_blank(ANON_KEY_VAR).ok_or(ConfigError::Missing(ANON_KEY_VAR))?;
        let mut config = Self::new(&url, anon_key)?;

        if let Some(key) = non_blank(SERVICE_ROLE_KEY_VAR) {
            config = config.with_service_role_key(key);
        }
        if let Some(raw) = non_blank(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout { raw: raw.clone() })?;
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout { raw });
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_service_role_key(mut self, key: impl Into<String>) -> Self {
        self.service_role_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    #[must_use]
    pub fn service_role_key(&self) -> Option<&str> {
        self.service_role_key.as_deref()
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url.as_str())
            .field("service_role_key", &self.service_role_key.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Parse and normalise to a trailing slash so relative joins keep any path prefix.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|_| ConfigError::InvalidUrl {
        raw: raw.to_owned(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            raw: raw.to_owned(),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_required_and_optional_values() {
        let config = BackendConfig::from_lookup(lookup(&[
            (URL_VAR, "https://abc.supabase.co"),
            (ANON_KEY_VAR, "anon"),
            (SERVICE_ROLE_KEY_VAR, "service"),
            (TIMEOUT_VAR, "15"),
        ]))
        .unwrap();
        assert_eq!(config.url().as_str(), "https://abc.supabase.co/");
        assert_eq!(config.anon_key(), "anon");
        assert_eq!(config.service_role_key(), Some("service"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn missing_url_is_reported_by_name() {
        let err = BackendConfig::from_lookup(lookup(&[(ANON_KEY_VAR, "anon")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(URL_VAR));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = BackendConfig::from_lookup(lookup(&[
            (URL_VAR, "https://abc.supabase.co"),
            (ANON_KEY_VAR, "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(ANON_KEY_VAR));
    }

    #[test]
    fn rejects_non_http_urls_and_zero_timeout() {
        assert!(matches!(
            BackendConfig::new("ftp://abc", "anon"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        let err = BackendConfig::from_lookup(lookup(&[
            (URL_VAR, "http://localhost:54321"),
            (ANON_KEY_VAR, "anon"),
            (TIMEOUT_VAR, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    }

    #[test]
    fn debug_output_omits_keys() {
        let config = BackendConfig::new("http://localhost:54321", "anon-secret")
            .unwrap()
            .with_service_role_key("service-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("anon-secret"));
        assert!(!debug.contains("service-secret"));
    }
}
