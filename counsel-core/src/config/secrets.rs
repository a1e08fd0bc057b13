//! API key handling with redaction
//!
//! Credentials never appear in Debug/Display output; anything that needs to
//! show a key for diagnostics goes through [`ApiKey::partial_redact`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider credential that redacts itself in all formatted output.
#[derive(Clone, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ApiKey {
    value: String,
}

impl ApiKey {
    /// Wrap a raw credential string.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Get the actual value (use with caution).
    pub fn expose_secret(&self) -> &str {
        &self.value
    }

    /// Check if the credential is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get a partially redacted version for diagnostics.
    pub fn partial_redact(&self) -> String {
        if self.value.is_empty() {
            return "[EMPTY]".to_string();
        }

        let len = self.value.len();
        if len <= 8 {
            "[REDACTED]".to_string()
        } else {
            format!("{}...{}", &self.value[..4.min(len)], &self.value[len - 4..])
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for ApiKey {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
