// src/config/mod.rs - Plugin configuration loading and parameter access

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration file {0} is neither valid TOML nor valid JSON")]
    UnrecognizedFormat(String),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("missing parameter: {0}")]
    MissingParam(String),
    #[error("invalid parameter {name}: {value:?} is not a valid {expected}")]
    InvalidParam {
        name: String,
        value: String,
        expected: &'static str,
    },
}

/// Configuration for one plugin instance.
///
/// `family` selects the driver variant, `name` identifies the instance, and
/// `params` carries the driver-specific settings as string key/value pairs.
/// Drivers read `params` through the typed accessors at construction time;
/// building a configuration never touches a device.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PluginConfiguration {
    pub name: String,
    pub family: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// On-disk shape shared by the TOML and JSON formats.
#[derive(Debug, Deserialize, Serialize)]
struct ConfigFile {
    plugin: PluginConfiguration,
}

impl PluginConfiguration {
    pub fn new(name: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family: family.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Load a configuration file, trying TOML first and JSON second.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config = if let Ok(file) = toml::from_str::<ConfigFile>(&contents) {
            tracing::info!("loaded plugin configuration from TOML file: {}", path.display());
            file.plugin
        } else if let Ok(file) = serde_json::from_str::<ConfigFile>(&contents) {
            tracing::info!("loaded plugin configuration from JSON file: {}", path.display());
            file.plugin
        } else {
            return Err(ConfigError::UnrecognizedFormat(path.display().to_string()));
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        file.plugin.validate()?;
        Ok(file.plugin)
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(contents)?;
        file.plugin.validate()?;
        Ok(file.plugin)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::MissingField("plugin.name"));
        }
        if self.family.is_empty() {
            return Err(ConfigError::MissingField("plugin.family"));
        }
        Ok(())
    }

    /// Look up a parameter by key.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Look up a parameter that the driver cannot do without.
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.param(key)
            .ok_or_else(|| ConfigError::MissingParam(key.to_string()))
    }

    pub fn param_f64(&self, key: &str) -> Result<f64, ConfigError> {
        Self::parse_param(self.require(key)?, key, "number")
    }

    /// Numeric parameter with a fallback for absent keys. A present but
    /// unparseable value is still an error.
    pub fn param_f64_or(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        match self.param(key) {
            Some(value) => Self::parse_param(value, key, "number"),
            None => Ok(default),
        }
    }

    pub fn param_u32(&self, key: &str) -> Result<u32, ConfigError> {
        Self::parse_param(self.require(key)?, key, "unsigned integer")
    }

    pub fn param_bool(&self, key: &str) -> Result<bool, ConfigError> {
        Self::parse_param(self.require(key)?, key, "boolean")
    }

    pub fn param_bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.param(key) {
            Some(value) => Self::parse_param(value, key, "boolean"),
            None => Ok(default),
        }
    }

    fn parse_param<T: FromStr>(
        value: &str,
        key: &str,
        expected: &'static str,
    ) -> Result<T, ConfigError> {
        value.trim().parse().map_err(|_| ConfigError::InvalidParam {
            name: key.to_string(),
            value: value.to_string(),
            expected,
        })
    }
}
