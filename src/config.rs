//! Aggregate SDK configuration
//!
//! Every section falls back to its defaults, so a configuration file only
//! needs the keys it changes:
//!
//! ```toml
//! [extraction]
//! relationship_blocks = "first_only"
//!
//! [diagram]
//! layout_engine = "dot"
//! dpi = 150
//!
//! [generation]
//! max_tokens = 1500
//! ```

use crate::export::DiagramOptions;
use crate::import::ExtractionConfig;
use crate::llm::GenerationConfig;
use crate::stream::StreamProtocol;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    IoError { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    ParseError(String),
}

/// Configuration of every SDK component
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SdkConfig {
    pub extraction: ExtractionConfig,
    pub stream: StreamProtocol,
    pub diagram: DiagramOptions,
    pub generation: GenerationConfig,
}

impl SdkConfig {
    /// Parse a TOML document
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load a TOML configuration file
    #[cfg(feature = "config-file")]
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a JSON document
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
