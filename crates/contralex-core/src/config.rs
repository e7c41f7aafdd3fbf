//! Analysis configuration: defaults, TOML file, environment overrides.
//!
//! ```toml
//! use_ai = true
//! temperature = 0.3
//! max_output_tokens = 8000
//! max_contract_length = 30000
//! call_timeout_secs = 60
//! model = "gemini-2.5-flash"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const ENV_USE_AI: &str = "CONTRALEX_USE_AI";
pub const ENV_TIMEOUT_SECS: &str = "CONTRALEX_TIMEOUT_SECS";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "GEMINI_MODEL";
pub const ENV_API_URL: &str = "GEMINI_API_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("{0}")]
    Invalid(String),
}

/// Which path the coordinator takes for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Try the generative path first, fall back to rules on failure.
    AiPreferred,
    /// Never call the model.
    RulesOnly,
}

/// Settings for the analysis core and the Gemini client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub use_ai: bool,
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub top_k: u32,
    pub top_p: f64,
    /// Hard cap on contract characters sent to the model.
    pub max_contract_length: usize,
    pub call_timeout_secs: u64,
    pub model: String,
    pub api_url: String,
    pub api_key: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            use_ai: true,
            temperature: 0.3,
            max_output_tokens: 8000,
            top_k: 40,
            top_p: 0.95,
            max_contract_length: 30_000,
            call_timeout_secs: 60,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                debug!(path = %path.display(), "loaded config file");
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from a variable lookup (normally `std::env::var`).
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_USE_AI) {
            self.use_ai = parse_bool(&v).ok_or(ConfigError::InvalidEnv {
                key: ENV_USE_AI,
                value: v,
            })?;
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            self.call_timeout_secs = v.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: ENV_TIMEOUT_SECS,
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup(ENV_API_KEY) {
            self.api_key = v;
        }
        if let Some(v) = lookup(ENV_MODEL) {
            self.model = v;
        }
        if let Some(v) = lookup(ENV_API_URL) {
            self.api_url = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "top_p must be within (0, 1], got {}",
                self.top_p
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(ConfigError::Invalid("max_output_tokens must be > 0".into()));
        }
        if self.max_contract_length == 0 {
            return Err(ConfigError::Invalid("max_contract_length must be > 0".into()));
        }
        if self.call_timeout_secs == 0 {
            return Err(ConfigError::Invalid("call_timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    pub fn mode(&self) -> AnalysisMode {
        if self.use_ai {
            AnalysisMode::AiPreferred
        } else {
            AnalysisMode::RulesOnly
        }
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
