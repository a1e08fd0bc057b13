//! Routing decision carried through the pipeline
//!
//! A [`RoutingDecision`] is created fresh per request, owned by that
//! request's handling, and discarded once the response is sent. Every stage
//! that changes the decision appends a clause to `reason` so the final
//! decision is fully auditable.

use serde::{Deserialize, Serialize};

use crate::catalog::ModelId;
use crate::routing::escalation::escalate;
use crate::routing::signals::RoutingSignals;

/// The routing pipeline's unit of work and the caller-visible audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Model the request should be sent to.
    pub selected: ModelId,
    /// Classifier confidence in `selected`, clamped to `[0, 1]`.
    pub confidence: f64,
    /// Signals the classification was based on.
    pub signals: RoutingSignals,
    /// Escalation successor of `selected` at the time it was last computed.
    pub fallback: ModelId,
    /// Append-only audit trail; one clause per transformation stage.
    pub reason: String,
}

impl RoutingDecision {
    /// Create a decision for `selected` with an initial reason clause.
    ///
    /// The fallback starts as the pure escalation successor; the
    /// availability resolver re-resolves it against configured providers.
    pub fn new(
        selected: ModelId,
        confidence: f64,
        signals: RoutingSignals,
        clause: impl Into<String>,
    ) -> Self {
        Self {
            selected,
            confidence: confidence.clamp(0.0, 1.0),
            signals,
            fallback: escalate(selected),
            reason: clause.into(),
        }
    }

    /// Append an audit clause. Clauses are `"; "`-separated and never
    /// overwrite earlier ones.
    pub fn push_reason(&mut self, clause: &str) {
        if self.reason.is_empty() {
            self.reason.push_str(clause);
        } else {
            self.reason.push_str("; ");
            self.reason.push_str(clause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::signals::extract;

    #[test]
    fn test_new_sets_fallback_to_successor() {
        let decision = RoutingDecision::new(
            ModelId::Gpt5Nano,
            0.8,
            extract("hello", None),
            "initial",
        );
        assert_eq!(decision.fallback, ModelId::Gpt5Mini);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let decision =
            RoutingDecision::new(ModelId::Gpt5, 1.7, extract("hello", None), "initial");
        assert_eq!(decision.confidence, 1.0);
    }

    #[test]
    fn test_reason_is_append_only() {
        let mut decision =
            RoutingDecision::new(ModelId::Gpt5Mini, 0.8, extract("hello", None), "first");
        decision.push_reason("second");
        decision.push_reason("third");
        assert_eq!(decision.reason, "first; second; third");
    }
}
