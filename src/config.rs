// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the client. Configuration is loaded from the environment at
//! startup; CLI flags may override individual values afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TETHER2INR_API_BASE_URL` | Exchange backend base URL | `http://localhost:5000/api` |
//! | `TETHER2INR_SESSION_DIR` | Directory holding the persisted session | platform data dir |
//! | `TETHER2INR_ADMIN_EMAILS` | Comma-separated admin allowlist | empty (role check only) |
//! | `COINGECKO_API_BASE_URL` | Market data base URL | `https://api.coingecko.com/api/v3` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `warn` |

use std::path::PathBuf;

use directories::ProjectDirs;
use url::Url;

/// Environment variable name for the exchange backend base URL.
pub const API_BASE_URL_ENV: &str = "TETHER2INR_API_BASE_URL";

/// Backend used when nothing is configured (local development server).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable name for the persisted session directory.
pub const SESSION_DIR_ENV: &str = "TETHER2INR_SESSION_DIR";

/// Fallback session directory when no platform data directory is known.
pub const FALLBACK_SESSION_DIR: &str = ".tether2inr";

/// Environment variable name for the admin email allowlist.
pub const ADMIN_EMAILS_ENV: &str = "TETHER2INR_ADMIN_EMAILS";

/// Environment variable name for the market data base URL.
pub const MARKET_API_BASE_URL_ENV: &str = "COINGECKO_API_BASE_URL";

/// Public CoinGecko API.
pub const DEFAULT_MARKET_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Environment variable name selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("{name} must use http or https, got {scheme}")]
    UnsupportedScheme { name: &'static str, scheme: String },
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash. Paths are appended verbatim.
    pub api_base_url: String,
    /// Directory holding the persisted session file.
    pub session_dir: PathBuf,
    /// Lower-cased admin emails; empty means the role claim alone decides.
    pub admin_emails: Vec<String>,
    /// Market data base URL without a trailing slash.
    pub market_api_base_url: String,
}

impl ClientConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base_url = normalize_base_url(
            API_BASE_URL_ENV,
            &get(API_BASE_URL_ENV).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        )?;
        let market_api_base_url = normalize_base_url(
            MARKET_API_BASE_URL_ENV,
            &get(MARKET_API_BASE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_MARKET_API_BASE_URL.to_string()),
        )?;
        let session_dir = get(SESSION_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_session_dir);
        let admin_emails = get(ADMIN_EMAILS_ENV)
            .map(|raw| parse_admin_emails(&raw))
            .unwrap_or_default();

        Ok(Self {
            api_base_url,
            session_dir,
            admin_emails,
            market_api_base_url,
        })
    }

    /// Replace the backend base URL (CLI override).
    pub fn with_api_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(API_BASE_URL_ENV, raw)?;
        Ok(self)
    }

    /// Replace the session directory (CLI override).
    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = dir.into();
        self
    }
}

/// Platform data directory (`~/.local/share/tether2inr` on Linux).
fn default_session_dir() -> PathBuf {
    ProjectDirs::from("", "", "tether2inr")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_SESSION_DIR))
}

fn normalize_base_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::UnsupportedScheme {
                name,
                scheme: other.to_string(),
            })
        }
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.market_api_base_url, DEFAULT_MARKET_API_BASE_URL);
        assert!(config.admin_emails.is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = config_from(&[(API_BASE_URL_ENV, "https://api.example.com/api/")]).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/api");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(API_BASE_URL_ENV, "   ")]).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = config_from(&[(API_BASE_URL_ENV, "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = config_from(&[(API_BASE_URL_ENV, "ftp://example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme { .. }));
    }

    #[test]
    fn admin_emails_are_split_and_lowercased() {
        let config =
            config_from(&[(ADMIN_EMAILS_ENV, " Ops@Example.com, ,root@example.com ")]).unwrap();
        assert_eq!(
            config.admin_emails,
            vec!["ops@example.com".to_string(), "root@example.com".to_string()]
        );
    }

    #[test]
    fn session_dir_override() {
        let config = config_from(&[(SESSION_DIR_ENV, "/tmp/t2i")]).unwrap();
        assert_eq!(config.session_dir, PathBuf::from("/tmp/t2i"));

        let config = config.with_session_dir("/var/t2i");
        assert_eq!(config.session_dir, PathBuf::from("/var/t2i"));
    }
}
