//! External-services configuration (`external-services.yaml`).
//!
//! ```yaml
//! site:
//!   base_url: https://blog.example.com
//! services: [dev, medium]
//! medium:
//!   token: "2b1f…"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::ServiceId;

pub const DEFAULT_MEDIUM_API_URL: &str = "https://api.medium.com/v1";

/// Where the author's own site lives; canonical links hang off `base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiteConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediumConfig {
    /// Integration token, sent as a bearer token.
    pub token: Option<String>,
    #[serde(default = "default_medium_api_url")]
    pub api_url: String,
}

fn default_medium_api_url() -> String {
    DEFAULT_MEDIUM_API_URL.to_string()
}

/// Parsed config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    /// Services to sync, in processing order. Every known service when absent.
    #[serde(default)]
    services: Option<Vec<String>>,
    #[serde(default)]
    pub medium: Option<MediumConfig>,
}

impl Config {
    /// Parse config from YAML text.
    pub fn from_yaml(contents: &str, source: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: source.to_path_buf(),
            source: e,
        })
    }

    /// Enabled services in configured order, duplicates dropped.
    pub fn services(&self) -> Result<Vec<ServiceId>, ConfigError> {
        let Some(names) = &self.services else {
            return Ok(ServiceId::ALL.to_vec());
        };
        let mut services = Vec::with_capacity(names.len());
        for name in names {
            let id: ServiceId = name.parse()?;
            if !services.contains(&id) {
                services.push(id);
            }
        }
        Ok(services)
    }

    /// Medium token, required once Medium is enabled.
    pub fn medium_token(&self) -> Result<&str, ConfigError> {
        self.medium
            .as_ref()
            .and_then(|m| m.token.as_deref())
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingCredential {
                service: "medium",
                field: "token",
            })
    }

    pub fn medium_api_url(&self) -> &str {
        self.medium
            .as_ref()
            .map(|m| m.api_url.as_str())
            .unwrap_or(DEFAULT_MEDIUM_API_URL)
    }
}

/// Load config from `path`.
pub fn load_at(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Config::from_yaml(&contents, path)
}
