//! The routing rule table
//!
//! Single source of truth for model selection. The heuristic classifier
//! applies it directly; the delegated classifier embeds its rendering in the
//! instruction block sent to the routing model. Rules are evaluated in
//! priority order and the first match wins.

use crate::catalog::ModelId;
use crate::routing::signals::{Ambiguity, Complexity, ContextSize, RoutingSignals, Stakes, TaskType};

/// Outcome of one rule-table evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleChoice {
    pub model: ModelId,
    pub confidence: f64,
    /// Audit clause naming the matched rule.
    pub clause: &'static str,
}

/// Apply the rule table to a set of signals. Total: every input matches
/// exactly one rule.
pub fn select(signals: &RoutingSignals) -> RuleChoice {
    // Rule 1: multimodal input goes to the multimodal line; the heavy tier
    // when the request also carries high stakes or multi-step reasoning.
    if signals.multimodal {
        let heavy = signals.stakes == Stakes::High
            || matches!(signals.task_type, TaskType::Reason | TaskType::Plan)
            || signals.complexity == Complexity::Complex;
        return if heavy {
            RuleChoice {
                model: ModelId::GeminiPro,
                confidence: 0.85,
                clause: "multimodal input with high stakes or multi-step reasoning",
            }
        } else {
            RuleChoice {
                model: ModelId::GeminiFlash,
                confidence: 0.9,
                clause: "multimodal input",
            }
        };
    }

    // Rule 2: high-volume, low-stakes pipeline work takes the cheapest
    // general tier.
    let pipeline_task = matches!(signals.task_type, TaskType::Classify | TaskType::Extract)
        || (signals.task_type == TaskType::Summarize && signals.context_size == ContextSize::Short);
    if pipeline_task && signals.stakes != Stakes::High {
        return RuleChoice {
            model: ModelId::Gpt5Nano,
            confidence: 0.85,
            clause: "low-stakes pipeline task",
        };
    }

    // Rule 3: general text/code with clear instructions fits the mid tier.
    let clear = !matches!(signals.task_type, TaskType::Reason | TaskType::Plan)
        && signals.ambiguity != Ambiguity::High
        && signals.stakes != Stakes::High
        && signals.complexity != Complexity::Complex
        && signals.context_size != ContextSize::Long;
    if clear {
        return RuleChoice {
            model: ModelId::Gpt5Mini,
            confidence: 0.75,
            clause: "general task with clear instructions",
        };
    }

    // Rule 4: complex reasoning, ambiguity, long context, or high stakes
    // take the heaviest general tier.
    RuleChoice {
        model: ModelId::Gpt5,
        confidence: 0.8,
        clause: "complex, ambiguous, or high-stakes request",
    }
}

/// Human-readable rendering of the rule table for introspection.
pub fn render_table() -> String {
    [
        "Routing rules, first match wins:",
        "  1. Multimodal input -> gemini-2.5-flash; gemini-2.5-pro when stakes \
         are high or the task needs multi-step reasoning.",
        "  2. Low-stakes pipeline task (classify, extract, short summary) -> \
         gpt-5-nano.",
        "  3. General text or code with clear instructions -> gpt-5-mini.",
        "  4. Complex reasoning, ambiguous, multi-document, or high-stakes \
         requests -> gpt-5.",
        "Unavailable providers remap to the nearest-capability tier of the \
         other provider. Decisions below confidence 0.65 and failed \
         invocations escalate one tier.",
    ]
    .join("\n")
}
