//! Configuration for tracing

use serde::{Deserialize, Serialize};

/// Main instrumentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentationConfig {
    /// Service name attached to log output
    pub service_name: String,
    /// Log level filter (e.g., "info", "debug", "carecom_http=trace")
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            service_name: "carecom".to_string(),
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl InstrumentationConfig {
    /// Create configuration from environment variables
    ///
    /// Supports the following environment variables:
    /// - `CARECOM_LOG` or `RUST_LOG`: Log level filter
    /// - `CARECOM_LOG_FORMAT`: `json` for JSON lines
    pub fn from_env() -> Self {
        let log_level = std::env::var("CARECOM_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        let json = std::env::var("CARECOM_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self {
            log_level,
            json,
            ..Self::default()
        }
    }

    /// Create a development configuration
    pub fn dev() -> Self {
        Self {
            service_name: "carecom-dev".to_string(),
            log_level: "debug".to_string(),
            json: false,
        }
    }
}
