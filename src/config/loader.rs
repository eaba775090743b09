//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::RawConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::schedule::model::GlobalConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("parse error: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    /// Whether the document itself was malformed.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ConfigError::ParseToml(_) | ConfigError::ParseYaml(_))
    }
}

/// Syntax of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.yaml` and `.yml` are YAML, everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Toml,
        }
    }
}

/// Parse and validate a configuration document.
///
/// Either the whole document is accepted or an error is returned; no partial
/// configuration ever escapes.
pub fn parse_config(source: &str, format: ConfigFormat) -> Result<GlobalConfig, ConfigError> {
    let raw: RawConfig = match format {
        ConfigFormat::Toml => toml::from_str(source)?,
        ConfigFormat::Yaml => serde_yaml::from_str(source)?,
    };
    Ok(validate_config(raw)?)
}

/// Load and validate configuration from a YAML or TOML file.
pub fn load_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
    tracing::info!(path = %path.display(), "Loading config");
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, ConfigFormat::from_path(path))
}
