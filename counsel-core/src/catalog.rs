//! Static model catalog
//!
//! The engine routes over a fixed, five-member catalog spanning two provider
//! families: OpenAI's general text/code line (three tiers) and Google's
//! multimodal-strong Gemini line (two tiers). The catalog never changes at
//! runtime; any string that does not name a catalog member is rejected at the
//! parse boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Provider family serving a catalog model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// General-purpose text/code line (gpt-5 family).
    OpenAI,
    /// Multimodal-strong line (Gemini family).
    Google,
}

impl ProviderKind {
    /// Stable lowercase name used in logs and decision metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Google => "google",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cost/capability tier within a provider line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Cheapest, fastest tier of a line.
    Cheap,
    /// Mid-range tier (general line only).
    Mid,
    /// Most capable tier of a line.
    Heavy,
}

/// Identifier of a (provider, tier) pair in the catalog.
///
/// Serializes as the provider-facing model string (e.g. `"gpt-5-mini"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    #[serde(rename = "gpt-5-nano")]
    Gpt5Nano,
    #[serde(rename = "gpt-5-mini")]
    Gpt5Mini,
    #[serde(rename = "gpt-5")]
    Gpt5,
    #[serde(rename = "gemini-2.5-flash")]
    GeminiFlash,
    #[serde(rename = "gemini-2.5-pro")]
    GeminiPro,
}

/// Error returned when a string does not name a catalog member.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown model '{0}'")]
pub struct UnknownModel(pub String);

impl ModelId {
    /// Every catalog member, cheapest tiers first within each family.
    pub const ALL: [ModelId; 5] = [
        ModelId::Gpt5Nano,
        ModelId::Gpt5Mini,
        ModelId::Gpt5,
        ModelId::GeminiFlash,
        ModelId::GeminiPro,
    ];

    /// The provider-facing model string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gpt5Nano => "gpt-5-nano",
            ModelId::Gpt5Mini => "gpt-5-mini",
            ModelId::Gpt5 => "gpt-5",
            ModelId::GeminiFlash => "gemini-2.5-flash",
            ModelId::GeminiPro => "gemini-2.5-pro",
        }
    }

    /// The provider family serving this model.
    pub fn provider(&self) -> ProviderKind {
        match self {
            ModelId::Gpt5Nano | ModelId::Gpt5Mini | ModelId::Gpt5 => ProviderKind::OpenAI,
            ModelId::GeminiFlash | ModelId::GeminiPro => ProviderKind::Google,
        }
    }

    /// The cost/capability tier within the model's line.
    pub fn tier(&self) -> Tier {
        match self {
            ModelId::Gpt5Nano | ModelId::GeminiFlash => Tier::Cheap,
            ModelId::Gpt5Mini => Tier::Mid,
            ModelId::Gpt5 | ModelId::GeminiPro => Tier::Heavy,
        }
    }

    /// Whether the model belongs to the multimodal-strong line.
    pub fn is_multimodal(&self) -> bool {
        self.provider() == ProviderKind::Google
    }

    /// All catalog members served by `provider`.
    pub fn for_provider(provider: ProviderKind) -> Vec<ModelId> {
        Self::ALL
            .iter()
            .copied()
            .filter(|m| m.provider() == provider)
            .collect()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_roundtrip() {
        for model in ModelId::ALL {
            let parsed: ModelId = model.as_str().parse().unwrap();
            assert_eq!(parsed, model);
            assert_eq!(model.to_string(), model.as_str());
        }
    }

    #[test]
    fn test_unknown_model_rejected() {
        let err = "gpt-6".parse::<ModelId>().unwrap_err();
        assert_eq!(err, UnknownModel("gpt-6".to_string()));
    }

    #[test]
    fn test_provider_assignment() {
        assert_eq!(ModelId::Gpt5Nano.provider(), ProviderKind::OpenAI);
        assert_eq!(ModelId::Gpt5.provider(), ProviderKind::OpenAI);
        assert_eq!(ModelId::GeminiFlash.provider(), ProviderKind::Google);
        assert_eq!(ModelId::GeminiPro.provider(), ProviderKind::Google);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(ModelId::Gpt5Nano.tier(), Tier::Cheap);
        assert_eq!(ModelId::Gpt5Mini.tier(), Tier::Mid);
        assert_eq!(ModelId::Gpt5.tier(), Tier::Heavy);
        assert_eq!(ModelId::GeminiFlash.tier(), Tier::Cheap);
        assert_eq!(ModelId::GeminiPro.tier(), Tier::Heavy);
    }

    #[test]
    fn test_multimodal_line() {
        assert!(ModelId::GeminiFlash.is_multimodal());
        assert!(ModelId::GeminiPro.is_multimodal());
        assert!(!ModelId::Gpt5.is_multimodal());
    }

    #[test]
    fn test_for_provider_partitions_catalog() {
        let openai = ModelId::for_provider(ProviderKind::OpenAI);
        let google = ModelId::for_provider(ProviderKind::Google);
        assert_eq!(openai.len(), 3);
        assert_eq!(google.len(), 2);
    }

    #[test]
    fn test_serde_uses_wire_ids() {
        let json = serde_json::to_string(&ModelId::GeminiFlash).unwrap();
        assert_eq!(json, "\"gemini-2.5-flash\"");
        let back: ModelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ModelId::GeminiFlash);
    }
}
