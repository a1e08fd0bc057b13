//! Provider availability and cross-provider remapping
//!
//! The classifier chooses freely over the whole catalog; this stage pins the
//! choice to a provider that actually holds credentials. When the chosen
//! model's provider is missing, the nearest-capability model of the other
//! family substitutes: heavy tier maps to heavy tier, everything else maps
//! to the other family's cheapest tier. No provider at all is a fatal
//! configuration error, surfaced and never retried.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::catalog::{ModelId, ProviderKind, Tier};
use crate::routing::decision::RoutingDecision;
use crate::routing::escalation::escalate;

/// Which provider families hold credentials. Derived once at startup,
/// read-only for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAvailability {
    pub openai: bool,
    pub google: bool,
}

impl ProviderAvailability {
    /// Whether `provider` holds credentials.
    pub fn has(&self, provider: ProviderKind) -> bool {
        match provider {
            ProviderKind::OpenAI => self.openai,
            ProviderKind::Google => self.google,
        }
    }

    /// Whether any provider holds credentials.
    pub fn any(&self) -> bool {
        self.openai || self.google
    }
}

/// Errors raised while validating a routing decision.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingError {
    /// Neither provider is configured. Fatal: the engine refuses to serve.
    #[error("no provider is configured; set OPENAI_API_KEY or GEMINI_API_KEY")]
    NoProviderConfigured,
}

/// Map `model` onto a catalog member whose provider is configured.
///
/// Identity when the model's own provider is available. Heavy tiers remap to
/// the other family's heavy tier; cheap and mid tiers remap to the other
/// family's cheapest tier.
pub fn remap(model: ModelId, availability: ProviderAvailability) -> Result<ModelId, RoutingError> {
    if availability.has(model.provider()) {
        return Ok(model);
    }

    let other = match model.provider() {
        ProviderKind::OpenAI => ProviderKind::Google,
        ProviderKind::Google => ProviderKind::OpenAI,
    };
    if !availability.has(other) {
        return Err(RoutingError::NoProviderConfigured);
    }

    Ok(equivalent_on(other, model.tier()))
}

/// Nearest-capability member of `provider` for a given tier.
fn equivalent_on(provider: ProviderKind, tier: Tier) -> ModelId {
    match (provider, tier) {
        (ProviderKind::OpenAI, Tier::Heavy) => ModelId::Gpt5,
        (ProviderKind::OpenAI, _) => ModelId::Gpt5Nano,
        (ProviderKind::Google, Tier::Heavy) => ModelId::GeminiPro,
        (ProviderKind::Google, _) => ModelId::GeminiFlash,
    }
}

/// Pin a decision to the configured providers, in place.
///
/// Remapping the selection appends an audit clause. The fallback is always
/// recomputed as the availability-resolved escalation successor of the final
/// selection, so it stays invocable at retry time.
pub fn resolve(
    decision: &mut RoutingDecision,
    availability: ProviderAvailability,
) -> Result<(), RoutingError> {
    let original = decision.selected;
    let remapped = remap(original, availability)?;
    if remapped != original {
        warn!(
            from = original.as_str(),
            to = remapped.as_str(),
            "provider unavailable, remapping"
        );
        decision.selected = remapped;
        decision.push_reason(&format!(
            "remapped {} -> {}: provider {} not configured",
            original,
            remapped,
            original.provider()
        ));
    }
    decision.fallback = remap(escalate(decision.selected), availability)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::signals::extract;

    const BOTH: ProviderAvailability = ProviderAvailability {
        openai: true,
        google: true,
    };
    const OPENAI_ONLY: ProviderAvailability = ProviderAvailability {
        openai: true,
        google: false,
    };
    const GOOGLE_ONLY: ProviderAvailability = ProviderAvailability {
        openai: false,
        google: true,
    };
    const NEITHER: ProviderAvailability = ProviderAvailability {
        openai: false,
        google: false,
    };

    #[test]
    fn test_remap_is_identity_when_available() {
        for model in ModelId::ALL {
            assert_eq!(remap(model, BOTH).unwrap(), model);
        }
    }

    #[test]
    fn test_heavy_maps_to_heavy() {
        assert_eq!(remap(ModelId::Gpt5, GOOGLE_ONLY).unwrap(), ModelId::GeminiPro);
        assert_eq!(remap(ModelId::GeminiPro, OPENAI_ONLY).unwrap(), ModelId::Gpt5);
    }

    #[test]
    fn test_lower_tiers_map_to_cheapest() {
        assert_eq!(
            remap(ModelId::Gpt5Nano, GOOGLE_ONLY).unwrap(),
            ModelId::GeminiFlash
        );
        assert_eq!(
            remap(ModelId::Gpt5Mini, GOOGLE_ONLY).unwrap(),
            ModelId::GeminiFlash
        );
        assert_eq!(
            remap(ModelId::GeminiFlash, OPENAI_ONLY).unwrap(),
            ModelId::Gpt5Nano
        );
    }

    #[test]
    fn test_no_provider_is_fatal() {
        assert_eq!(
            remap(ModelId::Gpt5, NEITHER).unwrap_err(),
            RoutingError::NoProviderConfigured
        );
    }

    #[test]
    fn test_resolve_appends_reason_on_remap() {
        let mut decision = RoutingDecision::new(
            ModelId::Gpt5Mini,
            0.8,
            extract("hello", None),
            "classified",
        );
        resolve(&mut decision, GOOGLE_ONLY).unwrap();
        assert_eq!(decision.selected, ModelId::GeminiFlash);
        assert!(decision.reason.contains("remapped"));
        assert!(decision.reason.contains("openai"));
    }

    #[test]
    fn test_resolve_keeps_reason_when_no_remap_needed() {
        let mut decision = RoutingDecision::new(
            ModelId::Gpt5Mini,
            0.8,
            extract("hello", None),
            "classified",
        );
        resolve(&mut decision, BOTH).unwrap();
        assert_eq!(decision.selected, ModelId::Gpt5Mini);
        assert_eq!(decision.reason, "classified");
        assert_eq!(decision.fallback, ModelId::Gpt5);
    }

    #[test]
    fn test_resolved_fallback_stays_invocable() {
        let mut decision = RoutingDecision::new(
            ModelId::GeminiPro,
            0.9,
            extract("hello", None),
            "classified",
        );
        resolve(&mut decision, GOOGLE_ONLY).unwrap();
        // escalate(pro) is gpt-5, which is not configured here.
        assert_eq!(decision.selected, ModelId::GeminiPro);
        assert_eq!(decision.fallback, ModelId::GeminiPro);
    }

    #[test]
    fn test_single_provider_owns_every_decision() {
        for model in ModelId::ALL {
            let mut decision =
                RoutingDecision::new(model, 0.9, extract("hello", None), "classified");
            resolve(&mut decision, OPENAI_ONLY).unwrap();
            assert_eq!(decision.selected.provider(), ProviderKind::OpenAI);
            assert_eq!(decision.fallback.provider(), ProviderKind::OpenAI);
        }
    }
}
