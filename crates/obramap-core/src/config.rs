use crate::error::{ObramapError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Production default for the AR activation radius, in meters.
pub const DEFAULT_RADIUS_M: f64 = 150.0;

/// Default upstream page range for an ingestion pass.
pub const DEFAULT_MIN_PAGES: u32 = 1;
pub const DEFAULT_MAX_PAGES: u32 = 5;

/// Layered configuration for obramap
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Base URL of the obrasgov investment-project API.
    pub gov_api_url: ConfigValue<String>,
    /// UF (state) filter applied to every upstream page request.
    pub uf: ConfigValue<String>,
    /// Optional API key sent as the `chave-api-dados` header.
    pub api_key: ConfigValue<Option<String>>,
    pub min_pages: ConfigValue<u32>,
    pub max_pages: ConfigValue<u32>,
    /// Default activation radius for proximity evaluation, meters.
    pub default_radius_m: ConfigValue<f64>,
    /// Port the HTTP API binds to.
    pub port: ConfigValue<u16>,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            gov_api_url: ConfigValue::new(
                "https://api.obrasgov.gestao.gov.br/obrasgov/api".to_string(),
                ConfigSource::Default,
            ),
            uf: ConfigValue::new("PE".to_string(), ConfigSource::Default),
            api_key: ConfigValue::new(None, ConfigSource::Default),
            min_pages: ConfigValue::new(DEFAULT_MIN_PAGES, ConfigSource::Default),
            max_pages: ConfigValue::new(DEFAULT_MAX_PAGES, ConfigSource::Default),
            default_radius_m: ConfigValue::new(DEFAULT_RADIUS_M, ConfigSource::Default),
            port: ConfigValue::new(3001, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ObramapError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| ObramapError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(url) = file_config.gov_api_url {
            self.gov_api_url.update(url, ConfigSource::File);
        }
        if let Some(uf) = file_config.uf {
            self.uf.update(uf, ConfigSource::File);
        }
        if let Some(key) = file_config.api_key {
            self.api_key.update(Some(key), ConfigSource::File);
        }
        if let Some(min_pages) = file_config.min_pages {
            self.min_pages.update(min_pages, ConfigSource::File);
        }
        if let Some(max_pages) = file_config.max_pages {
            self.max_pages.update(max_pages, ConfigSource::File);
        }
        if let Some(radius) = file_config.default_radius_m {
            self.default_radius_m.update(radius, ConfigSource::File);
        }
        if let Some(port) = file_config.port {
            self.port.update(port, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables.
    ///
    /// Invalid values warn and keep the previously layered value.
    pub fn load_from_env(mut self) -> Self {
        if let Ok(url) = env::var("OBRAMAP_GOV_API_URL") {
            self.gov_api_url.update(url, ConfigSource::Environment);
        }

        if let Ok(uf) = env::var("OBRAMAP_UF") {
            if uf.len() == 2 && uf.chars().all(|c| c.is_ascii_alphabetic()) {
                self.uf.update(uf.to_uppercase(), ConfigSource::Environment);
            } else {
                tracing::warn!("Invalid OBRAMAP_UF value '{}': expected two-letter UF code", uf);
            }
        }

        if let Ok(key) = env::var("OBRAMAP_GOV_API_KEY") {
            self.api_key.update(Some(key), ConfigSource::Environment);
        }

        if let Ok(raw) = env::var("OBRAMAP_MIN_PAGES") {
            match raw.parse::<u32>() {
                Ok(v) => self.min_pages.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid OBRAMAP_MIN_PAGES value '{}': expected positive integer",
                    raw
                ),
            }
        }

        if let Ok(raw) = env::var("OBRAMAP_MAX_PAGES") {
            match raw.parse::<u32>() {
                Ok(v) => self.max_pages.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid OBRAMAP_MAX_PAGES value '{}': expected positive integer",
                    raw
                ),
            }
        }

        if let Ok(raw) = env::var("OBRAMAP_RADIUS_M") {
            match raw.parse::<f64>() {
                Ok(v) if v > 0.0 => self.default_radius_m.update(v, ConfigSource::Environment),
                _ => tracing::warn!(
                    "Invalid OBRAMAP_RADIUS_M value '{}': expected positive number of meters",
                    raw
                ),
            }
        }

        if let Ok(raw) = env::var("OBRAMAP_PORT") {
            match raw.parse::<u16>() {
                Ok(v) => self.port.update(v, ConfigSource::Environment),
                Err(_) => {
                    tracing::warn!("Invalid OBRAMAP_PORT value '{}': expected port number", raw)
                }
            }
        }

        self
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.min_pages.value == 0 {
            return Err(ObramapError::ConfigInvalid {
                key: "min_pages".to_string(),
                reason: "page numbering starts at 1".to_string(),
            });
        }
        if self.max_pages.value < self.min_pages.value {
            return Err(ObramapError::ConfigInvalid {
                key: "max_pages".to_string(),
                reason: format!(
                    "max_pages ({}) must be >= min_pages ({})",
                    self.max_pages.value, self.min_pages.value
                ),
            });
        }
        Ok(())
    }
}

/// Shape of the optional TOML configuration file
#[derive(Debug, Deserialize)]
struct FileConfig {
    gov_api_url: Option<String>,
    uf: Option<String>,
    api_key: Option<String>,
    min_pages: Option<u32>,
    max_pages: Option<u32>,
    default_radius_m: Option<f64>,
    port: Option<u16>,
}
