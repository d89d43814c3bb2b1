//! Sampling configuration for documentation generation

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Environment variable overriding [`GenerationConfig::max_tokens`]
pub const MAX_TOKENS_ENV: &str = "COMPLETION_MAX_TOKENS";
/// Environment variable overriding [`GenerationConfig::temperature`]
pub const TEMPERATURE_ENV: &str = "COMPLETION_TEMPERATURE";

/// Sampling and streaming parameters of a chat-completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_tokens: u32,
    /// Sampling temperature (0.0 = deterministic)
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    /// Request a streamed response
    pub stream: bool,
    /// Ask for a final usage frame when streaming
    pub include_usage: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            temperature: 0.2,
            top_p: 0.9,
            frequency_penalty: 0.1,
            presence_penalty: 0.1,
            stream: true,
            include_usage: true,
        }
    }
}

impl GenerationConfig {
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Apply `COMPLETION_MAX_TOKENS` and `COMPLETION_TEMPERATURE` from the
    /// process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; unparseable values are logged and ignored
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(MAX_TOKENS_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(value) => {
                    debug!("{} overrides max_tokens to {}", MAX_TOKENS_ENV, value);
                    self.max_tokens = value;
                }
                Err(e) => warn!("Ignoring {}={:?}: {}", MAX_TOKENS_ENV, raw, e),
            }
        }

        if let Some(raw) = lookup(TEMPERATURE_ENV) {
            match raw.trim().parse::<f32>() {
                Ok(value) if value.is_finite() => {
                    debug!("{} overrides temperature to {}", TEMPERATURE_ENV, value);
                    self.temperature = value.clamp(0.0, 2.0);
                }
                Ok(value) => warn!("Ignoring {}={}: not finite", TEMPERATURE_ENV, value),
                Err(e) => warn!("Ignoring {}={:?}: {}", TEMPERATURE_ENV, raw, e),
            }
        }
    }
}
