//! End-to-end consultation orchestration
//!
//! The engine sequences the routing pipeline (extract signals, classify,
//! resolve availability, escalate on low confidence) and then invokes the
//! gateway with the chosen model. A failed invocation escalates one tier
//! and retries exactly once; a second failure is surfaced with both
//! underlying errors. There is no retry loop.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{ModelId, ProviderKind};
use crate::config::{ClassifierMode, ConfigError, CounselConfig};
use crate::providers::{Gateway, HttpGateway, ProviderError};
use crate::routing::{
    escalate_on_low_confidence, extract, resolve, successor, Classifier, DelegatedClassifier,
    HeuristicClassifier, ProviderAvailability, RoutingDecision, RoutingError,
};

/// System prompt sent with every consultation.
const SECOND_OPINION_SYSTEM_PROMPT: &str =
    "You are providing an independent second opinion to another AI assistant. \
     Evaluate the request on its own merits, disagree where warranted, and be \
     specific about anything you would change.";

/// One consultation request from the calling agent.
#[derive(Debug, Clone)]
pub struct ConsultRequest {
    /// The question to get a second opinion on. Required, non-empty.
    pub prompt: String,
    /// Optional supporting material (prior answer, code, documents).
    pub context: Option<String>,
}

impl ConsultRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// The engine's answer: the audited decision plus the model's response.
#[derive(Debug, Clone, Serialize)]
pub struct Consultation {
    /// Full routing decision, including signals and the audit trail.
    pub decision: RoutingDecision,
    /// Model that actually produced the response (the escalated one when
    /// the first invocation failed).
    pub model_used: ModelId,
    pub response_text: String,
}

impl Consultation {
    /// Provider family of the model that answered.
    pub fn provider(&self) -> ProviderKind {
        self.model_used.provider()
    }
}

/// Errors surfaced to the calling agent per request.
#[derive(Debug, Error)]
pub enum ConsultError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// Both the selected model and its escalation failed.
    #[error(
        "both invocation attempts failed: {first_model}: {first_error}; \
         then {second_model}: {second_error}"
    )]
    Exhausted {
        first_model: ModelId,
        first_error: String,
        second_model: ModelId,
        second_error: String,
    },
}

/// Errors raised while constructing an engine from the environment.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Read-only introspection of a configured engine.
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    pub classifier: String,
    pub providers: Vec<ProviderStatus>,
    /// Human-readable statement of the routing rule table.
    pub routing_rules: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub provider: ProviderKind,
    pub configured: bool,
    pub models: Vec<ModelId>,
}

/// The decision-and-invoke orchestrator.
pub struct Engine {
    availability: ProviderAvailability,
    classifier: Box<dyn Classifier>,
    gateway: Arc<dyn Gateway>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("availability", &self.availability)
            .field("classifier", &self.classifier.name())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Build an engine over an explicit gateway.
    ///
    /// Fails fast when no provider is configured; the engine never serves a
    /// request it cannot route.
    pub fn new(config: &CounselConfig, gateway: Arc<dyn Gateway>) -> Result<Self, RoutingError> {
        let availability = config.availability();
        if !availability.any() {
            return Err(RoutingError::NoProviderConfigured);
        }

        let classifier: Box<dyn Classifier> = match config.classifier {
            ClassifierMode::Heuristic => Box::new(HeuristicClassifier::new()),
            ClassifierMode::Delegated => Box::new(DelegatedClassifier::new(Arc::clone(&gateway))),
        };

        Ok(Self {
            availability,
            classifier,
            gateway,
        })
    }

    /// Resolve configuration from the environment and build the HTTP
    /// gateway.
    pub fn from_env() -> Result<Self, EngineError> {
        let config = CounselConfig::load()?;
        let gateway = Arc::new(HttpGateway::new(&config)?);
        Ok(Self::new(&config, gateway)?)
    }

    /// Which providers this engine can route to.
    pub fn availability(&self) -> ProviderAvailability {
        self.availability
    }

    /// Decide, invoke, and (once) escalate-and-retry.
    pub async fn consult(&self, request: &ConsultRequest) -> Result<Consultation, ConsultError> {
        if request.prompt.trim().is_empty() {
            return Err(ConsultError::EmptyPrompt);
        }

        let context = request.context.as_deref();
        let signals = extract(&request.prompt, context);
        let mut decision = self
            .classifier
            .classify(&request.prompt, context, signals, self.availability)
            .await;
        resolve(&mut decision, self.availability)?;
        escalate_on_low_confidence(&mut decision, self.availability)?;

        info!(
            model = decision.selected.as_str(),
            confidence = decision.confidence,
            classifier = self.classifier.name(),
            "routing decision"
        );

        let prompt = compose_prompt(&request.prompt, context);
        let first_model = decision.selected;
        let first_error = match self
            .gateway
            .invoke(first_model, &prompt, Some(SECOND_OPINION_SYSTEM_PROMPT))
            .await
        {
            Ok(text) => {
                return Ok(Consultation {
                    decision,
                    model_used: first_model,
                    response_text: text,
                });
            }
            Err(e) => e,
        };

        // One escalated retry; a second failure is fatal for the request.
        let retry_model = successor(first_model, self.availability)?;
        warn!(
            failed = first_model.as_str(),
            retry = retry_model.as_str(),
            error = %first_error,
            "invocation failed, escalating"
        );
        decision.push_reason(&format!(
            "invocation of {} failed ({}); retried with {}",
            first_model, first_error, retry_model
        ));

        match self
            .gateway
            .invoke(retry_model, &prompt, Some(SECOND_OPINION_SYSTEM_PROMPT))
            .await
        {
            Ok(text) => Ok(Consultation {
                decision,
                model_used: retry_model,
                response_text: text,
            }),
            Err(second_error) => Err(ConsultError::Exhausted {
                first_model,
                first_error: first_error.to_string(),
                second_model: retry_model,
                second_error: second_error.to_string(),
            }),
        }
    }

    /// List configured providers, their catalog models, and the routing
    /// rules.
    pub fn describe(&self) -> EngineInfo {
        let providers = [ProviderKind::OpenAI, ProviderKind::Google]
            .into_iter()
            .map(|provider| ProviderStatus {
                provider,
                configured: self.availability.has(provider),
                models: ModelId::for_provider(provider),
            })
            .collect();

        EngineInfo {
            classifier: self.classifier.name().to_string(),
            providers,
            routing_rules: crate::routing::render_table(),
        }
    }
}

fn compose_prompt(prompt: &str, context: Option<&str>) -> String {
    match context {
        Some(ctx) => format!("{}\n\nAdditional context:\n{}", prompt, ctx),
        None => prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_prompt_with_context() {
        let composed = compose_prompt("question", Some("background"));
        assert!(composed.starts_with("question"));
        assert!(composed.contains("background"));
    }

    #[test]
    fn test_consult_request_builder() {
        let request = ConsultRequest::new("q").with_context("c");
        assert_eq!(request.prompt, "q");
        assert_eq!(request.context.as_deref(), Some("c"));
    }
}
