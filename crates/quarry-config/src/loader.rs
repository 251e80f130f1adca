//! Config file loading
//!
//! The format is chosen by file extension: `.toml`, `.yaml`/`.yml` or
//! `.json`. Missing sections and fields fall back to their defaults; the
//! loaded config is validated before it is returned.

use crate::components::CompilerConfig;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuarryConfig {
    /// Condition compiler settings
    pub compiler: CompilerConfig,
}

impl QuarryConfig {
    /// Validate every component.
    pub fn validate(&self) -> ConfigResult<()> {
        self.compiler.validate()
    }
}

/// Supported config file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (requires the `toml` feature)
    Toml,
    /// YAML (requires the `yaml` feature)
    Yaml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::UnsupportedFormat(format!(
                "'{}' ({})",
                other,
                path.display()
            ))),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        }
    }
}

/// Loads and validates [`QuarryConfig`]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read, parse and validate a config file.
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<QuarryConfig> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), format = format.name(), "Loading config");
        Self::load_from_str(&content, format)
    }

    /// Parse and validate config content in the given format.
    pub fn load_from_str(content: &str, format: ConfigFormat) -> ConfigResult<QuarryConfig> {
        let config = Self::parse(content, format)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str, format: ConfigFormat) -> ConfigResult<QuarryConfig> {
        let parse_error = |message: String| ConfigError::Parse {
            format: format.name(),
            message,
        };

        match format {
            #[cfg(feature = "toml")]
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
            #[cfg(feature = "yaml")]
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
            #[allow(unreachable_patterns)]
            other => Err(ConfigError::UnsupportedFormat(format!(
                "{} support is not enabled",
                other.name()
            ))),
        }
    }
}
