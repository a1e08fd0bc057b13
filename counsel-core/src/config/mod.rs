//! Configuration for the consultation engine
//!
//! Two independent optional credentials decide which providers the engine
//! may route to. Resolution happens exactly once, at startup: environment
//! variables take precedence, an optional YAML file fills the gaps, and the
//! result is immutable for the lifetime of the process.

mod error;
mod file;
mod secrets;

pub use error::{ConfigError, ConfigResult};
pub use file::FileConfig;
pub use secrets::ApiKey;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::routing::ProviderAvailability;

/// Environment variable holding the OpenAI credential.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the Gemini credential.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable selecting the classification strategy.
pub const CLASSIFIER_VAR: &str = "COUNSEL_CLASSIFIER";
/// Environment variable naming an explicit config file path.
pub const CONFIG_PATH_VAR: &str = "COUNSEL_CONFIG";
/// Environment variable overriding the OpenAI base URL.
pub const OPENAI_BASE_URL_VAR: &str = "COUNSEL_OPENAI_BASE_URL";
/// Environment variable overriding the Gemini base URL.
pub const GOOGLE_BASE_URL_VAR: &str = "COUNSEL_GOOGLE_BASE_URL";

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Which classification strategy the engine runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
    /// Local rule-table classification, no model call.
    #[default]
    Heuristic,
    /// One cheap model call decides the route; falls back to heuristic.
    Delegated,
}

impl FromStr for ClassifierMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" => Ok(ClassifierMode::Heuristic),
            "delegated" => Ok(ClassifierMode::Delegated),
            other => Err(ConfigError::InvalidValue {
                field: "classifier".to_string(),
                message: format!("expected 'heuristic' or 'delegated', got '{}'", other),
            }),
        }
    }
}

/// Resolved, immutable engine configuration.
#[derive(Debug, Clone)]
pub struct CounselConfig {
    pub openai_api_key: Option<ApiKey>,
    pub gemini_api_key: Option<ApiKey>,
    pub classifier: ClassifierMode,
    pub openai_base_url: String,
    pub google_base_url: String,
}

impl Default for CounselConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            gemini_api_key: None,
            classifier: ClassifierMode::default(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            google_base_url: DEFAULT_GOOGLE_BASE_URL.to_string(),
        }
    }
}

impl CounselConfig {
    /// Resolve configuration from the process environment and the optional
    /// config file.
    pub fn load() -> ConfigResult<Self> {
        let file = file::load_default()?;
        Self::resolve(|var| std::env::var(var).ok(), file)
    }

    /// Resolve configuration from an explicit environment lookup and an
    /// optional file fallback. Environment values win for every key.
    pub fn resolve(
        env: impl Fn(&str) -> Option<String>,
        file: Option<FileConfig>,
    ) -> ConfigResult<Self> {
        let file = file.unwrap_or_default();

        let openai_api_key = env(OPENAI_API_KEY_VAR)
            .or(file.openai_api_key)
            .filter(|k| !k.trim().is_empty())
            .map(ApiKey::new);
        let gemini_api_key = env(GEMINI_API_KEY_VAR)
            .or(file.gemini_api_key)
            .filter(|k| !k.trim().is_empty())
            .map(ApiKey::new);

        let classifier = match env(CLASSIFIER_VAR).or(file.classifier) {
            Some(raw) => raw.parse()?,
            None => ClassifierMode::default(),
        };

        let openai_base_url = env(OPENAI_BASE_URL_VAR)
            .or(file.openai_base_url)
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
        let google_base_url = env(GOOGLE_BASE_URL_VAR)
            .or(file.google_base_url)
            .unwrap_or_else(|| DEFAULT_GOOGLE_BASE_URL.to_string());

        validate_base_url("openai_base_url", &openai_base_url)?;
        validate_base_url("google_base_url", &google_base_url)?;

        Ok(Self {
            openai_api_key,
            gemini_api_key,
            classifier,
            openai_base_url,
            google_base_url,
        })
    }

    /// Provider availability derived from which credentials are present.
    pub fn availability(&self) -> ProviderAvailability {
        ProviderAvailability {
            openai: self.openai_api_key.is_some(),
            google: self.gemini_api_key.is_some(),
        }
    }
}

fn validate_base_url(field: &str, value: &str) -> ConfigResult<()> {
    match url::Url::parse(value) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        Ok(parsed) => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("URL scheme must be http or https, got: {}", parsed.scheme()),
        }),
        Err(e) => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: e.to_string(),
        }),
    }
}
