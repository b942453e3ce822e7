//! Session configuration loaded from TOML.
//!
//! - `SessionConfig::default()` parses the embedded `default_config.toml`
//! - `parse_config_toml(toml)` parses and validates user content
//! - the config is handed to the session explicitly; there is no global

use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_TOML: &str = include_str!("default_config.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub input: InputSettings,
    #[serde(default)]
    pub appearance: AppearanceSettings,
    #[serde(default)]
    pub deploy: DeploySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSettings {
    #[serde(default)]
    pub schema: String,
    #[serde(default)]
    pub ascii_mode: bool,
    #[serde(default = "default_simplified")]
    pub simplified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceSettings {
    #[serde(default)]
    pub enable_color_scheme: bool,
    #[serde(default)]
    pub color_scheme: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploySettings {
    #[serde(default)]
    pub full_check_on_start: bool,
}

fn default_simplified() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        // The embedded file is covered by `default_config_parses`.
        parse_config_toml(DEFAULT_CONFIG_TOML).unwrap_or(Self {
            input: InputSettings {
                schema: String::new(),
                ascii_mode: false,
                simplified: true,
            },
            appearance: AppearanceSettings::default(),
            deploy: DeploySettings::default(),
        })
    }
}

impl SessionConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        parse_config_toml(&content)
    }

    /// The color scheme the user forced, if any.
    pub fn color_scheme_override(&self) -> Option<&str> {
        let a = &self.appearance;
        if a.enable_color_scheme && !a.color_scheme.is_empty() {
            Some(a.color_scheme.as_str())
        } else {
            None
        }
    }

    pub fn with_schema(mut self, schema_id: impl Into<String>) -> Self {
        self.input.schema = schema_id.into();
        self
    }
}

pub fn parse_config_toml(toml_str: &str) -> Result<SessionConfig, ConfigError> {
    let config: SessionConfig =
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &SessionConfig) -> Result<(), ConfigError> {
    let schema = &config.input.schema;
    if schema.chars().any(|c| c.is_whitespace()) {
        return Err(ConfigError::InvalidValue {
            field: "input.schema".to_string(),
            reason: format!("schema id {schema:?} must not contain whitespace"),
        });
    }
    let a = &config.appearance;
    if a.enable_color_scheme && a.color_scheme.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "appearance.color_scheme".to_string(),
            reason: "must be set when enable_color_scheme is true".to_string(),
        });
    }
    Ok(())
}
