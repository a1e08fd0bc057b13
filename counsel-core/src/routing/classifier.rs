//! Classification strategies
//!
//! Two implementations of the same contract share the rule table in
//! [`rules`](crate::routing::rules): a local heuristic that never leaves the
//! process, and a delegated strategy that asks the cheapest configured model
//! to route. Neither strategy can fail: every degraded path produces a
//! usable decision with an audit clause.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::ModelId;
use crate::providers::Gateway;
use crate::routing::availability::ProviderAvailability;
use crate::routing::decision::RoutingDecision;
use crate::routing::rules;
use crate::routing::signals::RoutingSignals;

/// A routing strategy: turn a request and its signals into a decision.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Produce a routing decision. Infallible by contract; degraded paths
    /// default and annotate `reason` instead of erroring.
    async fn classify(
        &self,
        prompt: &str,
        context: Option<&str>,
        signals: RoutingSignals,
        availability: ProviderAvailability,
    ) -> RoutingDecision;

    /// Name of this strategy for logs and introspection.
    fn name(&self) -> &'static str;
}

/// Rule-table classification over the extracted signals. No model call.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Classifier for HeuristicClassifier {
    async fn classify(
        &self,
        _prompt: &str,
        _context: Option<&str>,
        signals: RoutingSignals,
        _availability: ProviderAvailability,
    ) -> RoutingDecision {
        let choice = rules::select(&signals);
        debug!(model = choice.model.as_str(), "heuristic classification");
        RoutingDecision::new(
            choice.model,
            choice.confidence,
            signals,
            format!("heuristic: {}", choice.clause),
        )
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Classification delegated to the cheapest configured model.
///
/// The routing model receives the catalog and rule table as instructions
/// and must answer with a strict JSON object. A transport failure falls
/// back to [`HeuristicClassifier`] behaviour; a malformed answer is
/// downgraded at the parse boundary.
pub struct DelegatedClassifier {
    gateway: Arc<dyn Gateway>,
}

impl DelegatedClassifier {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// The model that performs routing: cheapest general tier when OpenAI
    /// is configured, otherwise the multimodal light tier.
    fn routing_model(availability: ProviderAvailability) -> ModelId {
        if availability.openai {
            ModelId::Gpt5Nano
        } else {
            ModelId::GeminiFlash
        }
    }

    fn instructions() -> String {
        format!(
            "You are the routing controller for a second-opinion service. \
             Choose exactly one model for the request below.\n\
             \n\
             Catalog: gpt-5-nano (cheap, fast), gpt-5-mini (general), gpt-5 \
             (deep reasoning), gemini-2.5-flash (multimodal, fast), \
             gemini-2.5-pro (multimodal, deep).\n\
             \n\
             {}\n\
             \n\
             Answer with one JSON object and nothing else:\n\
             {{\"model\": \"<catalog id>\", \"confidence\": <0.0-1.0>, \
             \"reason\": \"<one sentence>\"}}",
            rules::render_table()
        )
    }

    fn payload(prompt: &str, context: Option<&str>) -> String {
        match context {
            Some(ctx) => format!("Request:\n{}\n\nContext:\n{}", prompt, ctx),
            None => format!("Request:\n{}", prompt),
        }
    }
}

#[async_trait]
impl Classifier for DelegatedClassifier {
    async fn classify(
        &self,
        prompt: &str,
        context: Option<&str>,
        signals: RoutingSignals,
        availability: ProviderAvailability,
    ) -> RoutingDecision {
        let via = Self::routing_model(availability);
        let reply = self
            .gateway
            .invoke(via, &Self::payload(prompt, context), Some(&Self::instructions()))
            .await;

        match reply {
            Ok(reply) => parse_choice(&reply, signals, via),
            Err(e) => {
                // Transport failure, not malformed output: fall back to the
                // local rule table rather than raising.
                warn!(via = via.as_str(), error = %e, "delegated classification failed");
                let choice = rules::select(&signals);
                let mut decision = RoutingDecision::new(
                    choice.model,
                    choice.confidence,
                    signals,
                    format!("delegated classification via {} failed: {}", via, e),
                );
                decision.push_reason(&format!("heuristic: {}", choice.clause));
                decision
            }
        }
    }

    fn name(&self) -> &'static str {
        "delegated"
    }
}

/// Raw decision shape expected back from the routing model.
#[derive(Debug, Deserialize)]
struct RawChoice {
    model: String,
    #[serde(default = "default_confidence")]
    confidence: f64,
    #[serde(default)]
    reason: Option<String>,
}

fn default_confidence() -> f64 {
    0.5
}

/// The single parse boundary for delegated replies.
///
/// Nothing past this function ever sees the raw model output: fences are
/// stripped, the JSON object extracted, the model name validated against
/// the catalog, and the confidence clamped. Any failure substitutes the
/// safe default (mid general tier, confidence 0.5).
fn parse_choice(reply: &str, signals: RoutingSignals, via: ModelId) -> RoutingDecision {
    let raw = extract_json_object(reply).and_then(|s| serde_json::from_str::<RawChoice>(s).ok());

    match raw {
        Some(raw) => match raw.model.parse::<ModelId>() {
            Ok(model) => {
                let mut decision = RoutingDecision::new(
                    model,
                    raw.confidence,
                    signals,
                    format!("delegated via {}", via),
                );
                if let Some(reason) = raw.reason.filter(|r| !r.trim().is_empty()) {
                    decision.push_reason(&reason);
                }
                decision
            }
            Err(_) => safe_default(
                signals,
                format!("unknown model downgraded ('{}' not in catalog)", raw.model),
            ),
        },
        None => safe_default(
            signals,
            "unknown model downgraded (unparseable routing reply)".to_string(),
        ),
    }
}

fn safe_default(signals: RoutingSignals, clause: String) -> RoutingDecision {
    RoutingDecision::new(ModelId::Gpt5Mini, 0.5, signals, clause)
}

/// Slice out the outermost `{...}` so fenced or chatty replies still parse.
fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}
