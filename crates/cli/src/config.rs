//! CLI configuration utilities

use anyhow::{Context, Result};
use carecom_http::ClientConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name inside the data directory
pub const CONFIG_FILE: &str = "carecom.toml";

/// Settings read from the config file and `CARECOM__*` variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub api: ClientConfig,
}

impl CliConfig {
    /// Layer defaults, the config file and environment overrides.
    ///
    /// An explicit `path` must exist; the default file in `data_dir` is
    /// optional.
    pub fn load(path: Option<&Path>, data_dir: &Path) -> Result<Self> {
        let defaults = Self {
            api: ClientConfig::from_env(),
        };
        let (file, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (default_config_path(data_dir), false),
        };

        let settings = Config::builder()
            .add_source(Config::try_from(&defaults)?)
            .add_source(File::from(file.as_path()).required(required))
            .add_source(
                Environment::with_prefix("CARECOM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to load configuration from {}", file.display()))?;

        Ok(settings.try_deserialize()?)
    }

    /// Write as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Generate a default configuration file
pub fn generate_default_config(path: &Path) -> Result<()> {
    CliConfig::default().save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carecom_http::client::MatchMode;

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.api.login_path, "/login");
        assert_eq!(config.api.match_mode, MatchMode::Prefix);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(CliConfig::load(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = default_config_path(dir.path());
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://tb.example.id/api\"\ntimeout_secs = 15\nmatch_mode = \"substring\"\n",
        )
        .unwrap();

        let config = CliConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.api.base_url, "https://tb.example.id/api");
        assert_eq!(config.api.timeout_secs, Some(15));
        assert_eq!(config.api.match_mode, MatchMode::Substring);
        assert_eq!(config.api.pmo_fragment, "/pmo/");
    }

    #[test]
    fn test_generated_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        generate_default_config(&path).unwrap();

        let config = CliConfig::load(Some(&path), dir.path()).unwrap();
        assert_eq!(config.api.public_prefixes, ClientConfig::default().public_prefixes);
    }
}
