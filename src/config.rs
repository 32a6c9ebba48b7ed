//! Gateway configuration: defaults, config file, environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::core::HttpClientConfig;
use crate::error::GatewayError;
use crate::provider::constants::openai;

pub const BASE_URL_ENV_VAR: &str = "PROMPTGATE_BASE_URL";
pub const MODEL_ENV_VAR: &str = "PROMPTGATE_MODEL";

const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub default_model: String,
    /// Environment variable holding the credential.
    pub api_key_env_var: String,
    /// Attempt budget for credential resolution.
    pub max_credential_attempts: u32,
    pub http: HttpClientConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: openai::API_BASE.to_string(),
            default_model: openai::DEFAULT_MODEL.to_string(),
            api_key_env_var: openai::API_KEY_ENV_VAR.to_string(),
            max_credential_attempts: DEFAULT_MAX_ATTEMPTS,
            http: HttpClientConfig::default(),
        }
    }
}

/// On-disk configuration; every field is optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    model: Option<String>,
    api_key_env_var: Option<String>,
    max_credential_attempts: Option<u32>,
    timeout_secs: Option<u64>,
}

impl GatewayConfig {
    /// Directory holding `config.toml`, under the platform config dir.
    pub fn config_dir() -> Result<PathBuf, GatewayError> {
        dirs::config_dir()
            .map(|dir| dir.join("promptgate"))
            .ok_or_else(|| {
                GatewayError::Configuration(
                    "Could not determine user config directory".to_string(),
                )
            })
    }

    pub fn config_file() -> Result<PathBuf, GatewayError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Defaults overlaid with the config file (when present), then with
    /// `PROMPTGATE_*` environment overrides.
    pub fn load(path: &Path) -> Result<Self, GatewayError> {
        let mut config = Self::default();

        if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                GatewayError::Configuration(format!("Failed to read {}: {e}", path.display()))
            })?;
            let file: ConfigFile = toml::from_str(&raw).map_err(|e| {
                GatewayError::Configuration(format!("Failed to parse {}: {e}", path.display()))
            })?;
            config.apply_file(file);
        }

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(model) = file.model {
            self.default_model = model;
        }
        if let Some(var) = file.api_key_env_var {
            self.api_key_env_var = var;
        }
        if let Some(attempts) = file.max_credential_attempts {
            self.max_credential_attempts = attempts;
        }
        if let Some(secs) = file.timeout_secs {
            self.http.timeout = Duration::from_secs(secs);
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV_VAR) {
            self.base_url = base_url;
        }
        if let Ok(model) = std::env::var(MODEL_ENV_VAR) {
            self.default_model = model;
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_api_key_env_var(mut self, var: impl Into<String>) -> Self {
        self.api_key_env_var = var.into();
        self
    }

    pub fn with_max_credential_attempts(mut self, attempts: u32) -> Self {
        self.max_credential_attempts = attempts;
        self
    }

    pub fn with_http_config(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }
}

/// Default config file contents written by first-run setup.
pub(crate) fn default_config_toml() -> String {
    format!(
        "# promptgate configuration\nbase_url = \"{}\"\nmodel = \"{}\"\n",
        openai::API_BASE,
        openai::DEFAULT_MODEL,
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = GatewayConfig::load(&path).unwrap();

        assert_eq!(config.base_url, openai::API_BASE);
        assert_eq!(config.default_model, openai::DEFAULT_MODEL);
        assert_eq!(config.api_key_env_var, openai::API_KEY_ENV_VAR);
        assert_eq!(config.max_credential_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "base_url = \"http://localhost:9000/v1\"\n\
             model = \"local-model\"\n\
             max_credential_attempts = 5\n\
             timeout_secs = 10"
        )
        .unwrap();

        let config = GatewayConfig::load(&path).unwrap();

        assert_eq!(config.base_url, "http://localhost:9000/v1");
        assert_eq!(config.default_model, "local-model");
        assert_eq!(config.max_credential_attempts, 5);
        assert_eq!(config.http.timeout, Duration::from_secs(10));
    }

    #[test]
    fn malformed_config_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = [not toml").unwrap();

        let error = GatewayConfig::load(&path).unwrap_err();
        match error {
            GatewayError::Configuration(message) => {
                assert!(message.contains("Failed to parse"));
            }
            other => panic!("Expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn default_config_toml_parses_back() {
        let raw = default_config_toml();
        let file: ConfigFile = toml::from_str(&raw).unwrap();

        assert_eq!(file.base_url.as_deref(), Some(openai::API_BASE));
        assert_eq!(file.model.as_deref(), Some(openai::DEFAULT_MODEL));
    }
}
