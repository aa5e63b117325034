//! Configuration module for environment variable parsing.
//!
//! All settings are read once at startup and never change afterwards.

use std::env;

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Base URL used when `GITLAB_BASE_URL` is not set.
pub const DEFAULT_GITLAB_BASE_URL: &str = "https://gitlab.com";

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Errors raised while loading configuration. All of them are fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// GitLab instance root, without trailing slash (e.g. `https://gitlab.com`)
    pub gitlab_base_url: String,

    /// Personal/project access token sent as `PRIVATE-TOKEN`
    pub gitlab_token: String,

    /// Shared secret expected in `X-Gitlab-Token`; `None` disables the check
    pub webhook_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match non_empty(lookup("PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let gitlab_token =
            non_empty(lookup("GITLAB_TOKEN")).ok_or(ConfigError::Missing("GITLAB_TOKEN"))?;

        let gitlab_base_url = match non_empty(lookup("GITLAB_BASE_URL")) {
            Some(raw) => parse_base_url(&raw)?,
            None => DEFAULT_GITLAB_BASE_URL.to_string(),
        };

        // Only an empty secret disables verification; whitespace is a valid value.
        let webhook_secret = lookup("GITLAB_WEBHOOK_SECRET").filter(|v| !v.is_empty());
        if webhook_secret.is_none() {
            warn!("webhook_secret_not_configured");
        }

        Ok(Config {
            port,
            gitlab_base_url,
            gitlab_token,
            webhook_secret,
        })
    }
}

/// Treat unset, empty and whitespace-only values alike.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validate the GitLab base URL and strip any trailing slash.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::Invalid {
        name: "GITLAB_BASE_URL",
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            name: "GITLAB_BASE_URL",
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("GITLAB_TOKEN", "glpat-123")]).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.gitlab_base_url, "https://gitlab.com");
        assert_eq!(config.gitlab_token, "glpat-123");
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn test_all_values_set() {
        let config = load(&[
            ("PORT", "9000"),
            ("GITLAB_TOKEN", "glpat-123"),
            ("GITLAB_BASE_URL", "https://gitlab.example.com/"),
            ("GITLAB_WEBHOOK_SECRET", "s3cret"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.gitlab_base_url, "https://gitlab.example.com");
        assert_eq!(config.webhook_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("GITLAB_TOKEN"));
        assert_eq!(
            load(&[("GITLAB_TOKEN", "  ")]).unwrap_err(),
            ConfigError::Missing("GITLAB_TOKEN")
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("GITLAB_TOKEN", "t"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load(&[("GITLAB_TOKEN", "t"), ("GITLAB_BASE_URL", "gitlab.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "GITLAB_BASE_URL", .. }));

        let err = load(&[("GITLAB_TOKEN", "t"), ("GITLAB_BASE_URL", "ftp://gitlab.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "GITLAB_BASE_URL", .. }));
    }

    #[test]
    fn test_empty_secret_is_disabled() {
        let config = load(&[("GITLAB_TOKEN", "t"), ("GITLAB_WEBHOOK_SECRET", "")]).unwrap();
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn test_whitespace_secret_is_kept() {
        let config = load(&[("GITLAB_TOKEN", "t"), ("GITLAB_WEBHOOK_SECRET", "   ")]).unwrap();
        assert_eq!(config.webhook_secret.as_deref(), Some("   "));
    }
}
