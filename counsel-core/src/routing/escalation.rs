//! Deterministic tier escalation
//!
//! A pure total order over the catalog forming two independent chains:
//! `gpt-5-nano -> gpt-5-mini -> gpt-5` for the general line and
//! `gemini-2.5-flash -> gemini-2.5-pro` for the multimodal line. The top of
//! either chain escalates to the global ceiling `gpt-5`, which is a fixed
//! point. Escalation is applied in exactly two situations: a low-confidence
//! decision after availability resolution, and a failed invocation at call
//! time.

use tracing::debug;

use crate::catalog::ModelId;
use crate::routing::availability::{remap, ProviderAvailability, RoutingError};
use crate::routing::decision::RoutingDecision;

/// Decisions below this confidence are escalated one tier before invocation.
pub const CONFIDENCE_FLOOR: f64 = 0.65;

/// The next tier up from `model`.
///
/// Total and terminating: from any catalog member the global ceiling is
/// reached within two applications, and the ceiling maps to itself.
pub fn escalate(model: ModelId) -> ModelId {
    match model {
        ModelId::Gpt5Nano => ModelId::Gpt5Mini,
        ModelId::Gpt5Mini => ModelId::Gpt5,
        ModelId::GeminiFlash => ModelId::GeminiPro,
        // Chain tops cross to the strongest overall option.
        ModelId::Gpt5 | ModelId::GeminiPro => ModelId::Gpt5,
    }
}

/// Availability-resolved escalation successor of `model`.
pub fn successor(
    model: ModelId,
    availability: ProviderAvailability,
) -> Result<ModelId, RoutingError> {
    remap(escalate(model), availability)
}

/// Escalate a low-confidence decision one tier, in place.
///
/// No-op when the confidence is at or above [`CONFIDENCE_FLOOR`]. Otherwise
/// the selection moves to its availability-resolved successor, the fallback
/// is recomputed, and an `escalated` clause is appended to the audit trail.
pub fn escalate_on_low_confidence(
    decision: &mut RoutingDecision,
    availability: ProviderAvailability,
) -> Result<(), RoutingError> {
    if decision.confidence >= CONFIDENCE_FLOOR {
        return Ok(());
    }

    let raw = decision.selected;
    let stepped = successor(raw, availability)?;
    decision.selected = stepped;
    decision.fallback = successor(stepped, availability)?;
    decision.push_reason(&format!(
        "escalated {} -> {}: confidence {:.2} below floor {:.2}",
        raw, stepped, decision.confidence, CONFIDENCE_FLOOR
    ));
    debug!(
        from = raw.as_str(),
        to = stepped.as_str(),
        confidence = decision.confidence,
        "low-confidence escalation"
    );
    Ok(())
}
