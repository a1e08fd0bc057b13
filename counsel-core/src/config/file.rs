//! YAML file fallback for configuration
//!
//! The file is optional and every field in it is optional; environment
//! variables always win over file values. Credential fields support
//! `${VAR}` interpolation so the file itself never has to hold a literal
//! key.

use regex::Regex;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::CONFIG_PATH_VAR;

/// On-disk configuration shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub openai_base_url: Option<String>,
    #[serde(default)]
    pub google_base_url: Option<String>,
}

/// Default config file location: `$XDG_CONFIG_HOME/counsel/config.yaml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("counsel").join("config.yaml"))
}

/// Load the file named by `COUNSEL_CONFIG`, or the default location.
///
/// A missing default file is not an error; a missing explicitly-named file
/// is.
pub fn load_default() -> Result<Option<FileConfig>, ConfigError> {
    if let Ok(explicit) = env::var(CONFIG_PATH_VAR) {
        return load_file(Path::new(&explicit)).map(Some);
    }
    match default_path() {
        Some(path) if path.exists() => load_file(&path).map(Some),
        _ => Ok(None),
    }
}

/// Load and interpolate one config file.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    let mut config: FileConfig =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;

    if let Some(key) = config.openai_api_key.take() {
        config.openai_api_key = Some(interpolate_env_vars(&key)?);
    }
    if let Some(key) = config.gemini_api_key.take() {
        config.gemini_api_key = Some(interpolate_env_vars(&key)?);
    }

    Ok(config)
}

/// Replace `${VAR}` references with environment variable values.
fn interpolate_env_vars(value: &str) -> Result<String, ConfigError> {
    let env_var_pattern = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static pattern");
    let mut result = value.to_string();

    for cap in env_var_pattern.captures_iter(value) {
        let full_match = cap.get(0).expect("capture 0 always present").as_str();
        let var_name = &cap[1];
        match env::var(var_name) {
            Ok(env_value) => {
                result = result.replace(full_match, &env_value);
            }
            Err(_) => {
                return Err(ConfigError::EnvVarNotFound {
                    var: var_name.to_string(),
                });
            }
        }
    }

    Ok(result)
}
