//! Client configuration

use super::classifier::MatchMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "CARECOM_API_URL";
/// Variable name used by the web frontend build, honoured as a fallback
pub const LEGACY_API_URL_ENV: &str = "VITE_API_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Shared configuration for the public and private clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URL, every request path is appended to it
    pub base_url: String,

    /// Default per-request deadline in seconds, unset means no deadline
    pub timeout_secs: Option<u64>,

    /// User agent sent with every request
    pub user_agent: String,

    /// Path prefixes that never carry a bearer token
    pub public_prefixes: Vec<String>,

    /// How request paths are matched against `public_prefixes`
    pub match_mode: MatchMode,

    /// Path fragment whose 401 responses are left to the caller
    pub pmo_fragment: String,

    /// Path fragments whose 404 responses are expected and not announced
    pub quiet_not_found: Vec<String>,

    /// View the user is sent to when the session is rejected
    pub login_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            user_agent: format!("carecom-client/{}", env!("CARGO_PKG_VERSION")),
            public_prefixes: [
                "/auth/login",
                "/auth/register",
                "/auth/forgot-password",
                "/auth/reset-password",
                "/public/",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            match_mode: MatchMode::Prefix,
            pmo_fragment: "/pmo/".to_string(),
            quiet_not_found: vec!["/pmo/patient".to_string()],
            login_path: "/login".to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults with the base URL taken from `CARECOM_API_URL`, then
    /// `VITE_API_URL`
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV)
            .or_else(|_| std::env::var(LEGACY_API_URL_ENV))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Defaults pointed at `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Default per-request deadline
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout().is_none());
        assert_eq!(config.match_mode, MatchMode::Prefix);
        assert!(config.public_prefixes.iter().any(|p| p == "/auth/login"));
        assert_eq!(config.login_path, "/login");
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = ClientConfig {
            timeout_secs: Some(0),
            ..ClientConfig::default()
        };
        assert!(config.timeout().is_none());

        let config = ClientConfig {
            timeout_secs: Some(15),
            ..ClientConfig::default()
        };
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"https://tb.example.id/api","match_mode":"substring"}"#)
                .unwrap();
        assert_eq!(config.base_url, "https://tb.example.id/api");
        assert_eq!(config.match_mode, MatchMode::Substring);
        assert_eq!(config.pmo_fragment, "/pmo/");
    }
}
