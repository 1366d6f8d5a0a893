//! # Harness Configuration
//!
//! Loaded in three layers: TOML file (or built-in defaults), then
//! `COMPANY_CONTRACT_*` environment variables, then command-line flags.
//!
//! ```toml
//! [target]
//! base_url = "http://localhost:3000/company"
//! timeout_secs = 10
//!
//! [fixtures]
//! seed = 42
//!
//! [scenarios]
//! nonexistent_id = "99999"
//! invalid_id_token = "invalid-id"
//!
//! [log]
//! level = "debug"
//! format = "json"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api-desafio-qa.onrender.com/company";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub target: TargetConfig,
    pub fixtures: FixtureConfig,
    pub scenarios: ScenarioConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub base_url: String,
    /// 0 disables the client timeout.
    pub timeout_secs: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl TargetConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Fixed seed for reproducible fixtures; random when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// An id the service is known not to have.
    pub nonexistent_id: String,
    /// A token that is not a syntactically valid id.
    pub invalid_id_token: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            nonexistent_id: "99999".to_string(),
            invalid_id_token: "invalid-id".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl HarnessConfig {
    /// File (or defaults when no path is given), then env overrides, then validation.
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::Read {
                    path: path.display().to_string(),
                    source: e,
                }
            }
        })?;
        Self::parse(&content)
    }

    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })
    }

    /// Naming: `COMPANY_CONTRACT_{FIELD}`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("COMPANY_CONTRACT_BASE_URL") {
            self.target.base_url = val;
        }
        if let Some(val) = lookup("COMPANY_CONTRACT_TIMEOUT_SECS") {
            match val.parse() {
                Ok(parsed) => self.target.timeout_secs = parsed,
                Err(_) => warn!(
                    value = val.as_str(),
                    "failed to parse COMPANY_CONTRACT_TIMEOUT_SECS, ignoring"
                ),
            }
        }
        if let Some(val) = lookup("COMPANY_CONTRACT_SEED") {
            match val.parse() {
                Ok(parsed) => self.fixtures.seed = Some(parsed),
                Err(_) => warn!(
                    value = val.as_str(),
                    "failed to parse COMPANY_CONTRACT_SEED, ignoring"
                ),
            }
        }
        if let Some(val) = lookup("COMPANY_CONTRACT_LOG_LEVEL") {
            self.log.level = val;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.target.base_url).map_err(|e| {
            ConfigError::InvalidValue {
                field: "target.base_url".to_string(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "target.base_url".to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if !matches!(self.log.format.as_str(), "text" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "log.format".to_string(),
                reason: format!("expected 'text' or 'json', got '{}'", self.log.format),
            });
        }
        tracing_subscriber::EnvFilter::try_new(&self.log.level).map_err(|e| {
            ConfigError::InvalidValue {
                field: "log.level".to_string(),
                reason: e.to_string(),
            }
        })?;

        for (field, token) in [
            ("scenarios.nonexistent_id", &self.scenarios.nonexistent_id),
            ("scenarios.invalid_id_token", &self.scenarios.invalid_id_token),
        ] {
            if token.trim().is_empty() || token.contains('/') {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be a single non-empty path segment".to_string(),
                });
            }
        }

        Ok(())
    }
}
