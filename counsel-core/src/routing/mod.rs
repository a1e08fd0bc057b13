//! Routing and escalation decision engine
//!
//! This module is the core of the crate: it classifies an incoming request,
//! selects a provider/model pair, validates the selection against configured
//! providers, and escalates deterministically on low confidence. Stages are
//! pure over their inputs and communicate through [`RoutingDecision`], whose
//! `reason` field accumulates one audit clause per transformation.

pub mod availability;
pub mod classifier;
pub mod decision;
pub mod escalation;
pub mod rules;
pub mod signals;

pub use availability::{remap, resolve, ProviderAvailability, RoutingError};
pub use classifier::{Classifier, DelegatedClassifier, HeuristicClassifier};
pub use decision::RoutingDecision;
pub use escalation::{escalate, escalate_on_low_confidence, successor, CONFIDENCE_FLOOR};
pub use rules::{render_table, select, RuleChoice};
pub use signals::{
    extract, Ambiguity, Complexity, ContextSize, RoutingSignals, Stakes, TaskType,
};
