//! Request signal extraction
//!
//! Derives the classification signals for a request from its raw text. All
//! heuristics here are pure functions over fixed keyword sets: no model
//! calls, no I/O, no failure mode. Keyword matching is deliberately
//! approximate; false positives and negatives are tolerated by every
//! downstream stage, which is why ambiguous inputs default to the middle
//! bucket rather than erroring.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How much rides on the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stakes {
    Low,
    Medium,
    High,
}

/// How underspecified the request is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ambiguity {
    Low,
    Medium,
    High,
}

/// Rough size bucket of prompt plus context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextSize {
    Short,
    Medium,
    Long,
}

/// Complexity bucket from word count, code fences, multi-question and
/// keyword heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

/// Dominant task category of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Classify,
    Extract,
    Summarize,
    Write,
    Code,
    Plan,
    Reason,
    Other,
}

/// Classification signals derived once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingSignals {
    /// Whether the request appears to reference non-text inputs.
    pub multimodal: bool,
    pub stakes: Stakes,
    pub ambiguity: Ambiguity,
    pub context_size: ContextSize,
    /// Whether the caller demands a machine-readable output format.
    pub strict_output: bool,
    pub task_type: TaskType,
    pub complexity: Complexity,
}

/// Terms suggesting image/document/audio/video input, matched per token.
const MULTIMODAL_TERMS: &[&str] = &[
    "image",
    "images",
    "picture",
    "pictures",
    "photo",
    "photos",
    "screenshot",
    "screenshots",
    "diagram",
    "figure",
    "chart",
    "pdf",
    "docx",
    "spreadsheet",
    "scan",
    "scanned",
    "audio",
    "recording",
    "video",
    "clip",
    "frame",
];

/// Inline-payload markers matched as substrings, not tokens.
const MULTIMODAL_MARKERS: &[&str] = &["base64", "data:image", "data:application"];

const HIGH_STAKES_TERMS: &[&str] = &[
    "production",
    "prod",
    "deploy",
    "deployment",
    "outage",
    "incident",
    "critical",
    "urgent",
    "security",
    "vulnerability",
    "exploit",
    "legal",
    "contract",
    "lawsuit",
    "medical",
    "patient",
    "diagnosis",
    "financial",
    "payment",
    "invoice",
    "compliance",
    "regulatory",
    "irreversible",
];

const LOW_STAKES_TERMS: &[&str] = &[
    "quick",
    "quickly",
    "draft",
    "rough",
    "brainstorm",
    "casual",
    "toy",
    "practice",
    "curious",
    "fun",
];

const VAGUE_TERMS: &[&str] = &[
    "something",
    "somehow",
    "stuff",
    "things",
    "whatever",
    "maybe",
    "unclear",
    "confused",
    "vague",
    "roughly",
    "kinda",
    "sorta",
];

const VAGUE_PHRASES: &[&str] = &["not sure", "no idea", "don't know", "or something"];

const STRICT_OUTPUT_TERMS: &[&str] = &["json", "yaml", "xml", "csv", "schema"];

const STRICT_OUTPUT_PHRASES: &[&str] = &["exact format", "strictly", "machine-readable"];

const COMPLEX_TERMS: &[&str] = &[
    "design",
    "architect",
    "architecture",
    "optimize",
    "optimise",
    "debug",
    "refactor",
    "migrate",
    "concurrency",
    "distributed",
    "scalability",
    "proof",
];

/// Keyword sets per task category. Sets are disjoint; the highest hit count
/// wins and ties fall back to [`TaskType::Other`].
const TASK_KEYWORDS: &[(TaskType, &[&str])] = &[
    (
        TaskType::Classify,
        &["classify", "categorize", "categorise", "label", "tag", "triage"],
    ),
    (
        TaskType::Extract,
        &["extract", "parse", "scrape", "retrieve", "pull"],
    ),
    (
        TaskType::Summarize,
        &["summarize", "summarise", "summary", "tldr", "condense", "digest"],
    ),
    (
        TaskType::Write,
        &["write", "draft", "compose", "rewrite", "email", "essay", "blog", "story"],
    ),
    (
        TaskType::Code,
        &[
            "code",
            "coding",
            "function",
            "bug",
            "implement",
            "compile",
            "script",
            "program",
            "rust",
            "python",
            "javascript",
        ],
    ),
    (
        TaskType::Plan,
        &["plan", "roadmap", "milestones", "strategy", "schedule", "organize", "prioritize"],
    ),
    (
        TaskType::Reason,
        &["why", "analyze", "analyse", "evaluate", "compare", "tradeoff", "tradeoffs", "prove", "assess", "decide"],
    ),
];

/// Word counts above this mark a long prompt for the complexity heuristic.
const LONG_PROMPT_WORDS: usize = 500;

/// Word-count boundaries for the context-size bucket.
const SHORT_CONTEXT_WORDS: usize = 300;
const LONG_CONTEXT_WORDS: usize = 2000;

/// Derive [`RoutingSignals`] from the raw request text.
///
/// Total function: every input produces a value. The prompt and optional
/// context are scanned case-insensitively as one combined document.
pub fn extract(prompt: &str, context: Option<&str>) -> RoutingSignals {
    let combined = match context {
        Some(ctx) => format!("{} {}", prompt, ctx),
        None => prompt.to_string(),
    };
    let lowered = combined.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let token_set: HashSet<&str> = tokens.iter().copied().collect();
    let word_count = combined.split_whitespace().count();

    RoutingSignals {
        multimodal: detect_multimodal(&lowered, &token_set),
        stakes: detect_stakes(&token_set),
        ambiguity: detect_ambiguity(&lowered, &tokens),
        context_size: bucket_context_size(word_count),
        strict_output: detect_strict_output(&lowered, &token_set),
        task_type: detect_task_type(&tokens),
        complexity: bucket_complexity(&lowered, &tokens, word_count),
    }
}

fn any_token(set: &HashSet<&str>, terms: &[&str]) -> bool {
    terms.iter().any(|t| set.contains(t))
}

fn detect_multimodal(lowered: &str, token_set: &HashSet<&str>) -> bool {
    any_token(token_set, MULTIMODAL_TERMS) || MULTIMODAL_MARKERS.iter().any(|m| lowered.contains(m))
}

fn detect_stakes(token_set: &HashSet<&str>) -> Stakes {
    if any_token(token_set, HIGH_STAKES_TERMS) {
        Stakes::High
    } else if any_token(token_set, LOW_STAKES_TERMS) {
        Stakes::Low
    } else {
        Stakes::Medium
    }
}

fn detect_ambiguity(lowered: &str, tokens: &[&str]) -> Ambiguity {
    let word_hits = tokens.iter().filter(|t| VAGUE_TERMS.contains(t)).count();
    let phrase_hits = VAGUE_PHRASES.iter().filter(|p| lowered.contains(*p)).count();
    match word_hits + phrase_hits {
        0 => Ambiguity::Low,
        1 => Ambiguity::Medium,
        _ => Ambiguity::High,
    }
}

fn bucket_context_size(word_count: usize) -> ContextSize {
    if word_count < SHORT_CONTEXT_WORDS {
        ContextSize::Short
    } else if word_count <= LONG_CONTEXT_WORDS {
        ContextSize::Medium
    } else {
        ContextSize::Long
    }
}

fn detect_strict_output(lowered: &str, token_set: &HashSet<&str>) -> bool {
    any_token(token_set, STRICT_OUTPUT_TERMS)
        || STRICT_OUTPUT_PHRASES.iter().any(|p| lowered.contains(p))
}

fn detect_task_type(tokens: &[&str]) -> TaskType {
    let mut best = TaskType::Other;
    let mut best_hits = 0usize;
    let mut tied = false;

    for (task, keywords) in TASK_KEYWORDS {
        let hits = tokens.iter().filter(|t| keywords.contains(t)).count();
        if hits > best_hits {
            best = *task;
            best_hits = hits;
            tied = false;
        } else if hits == best_hits && hits > 0 {
            tied = true;
        }
    }

    if best_hits == 0 || tied {
        TaskType::Other
    } else {
        best
    }
}

fn bucket_complexity(lowered: &str, tokens: &[&str], word_count: usize) -> Complexity {
    let mut score = 0usize;
    if word_count > LONG_PROMPT_WORDS {
        score += 1;
    }
    // An opening fence and a closing fence count as one block.
    if lowered.matches("```").count() >= 2 {
        score += 1;
    }
    if lowered.matches('?').count() >= 2 {
        score += 1;
    }
    if tokens.iter().any(|t| COMPLEX_TERMS.contains(t)) {
        score += 1;
    }

    match score {
        0 => Complexity::Simple,
        1 | 2 => Complexity::Moderate,
        _ => Complexity::Complex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_is_total_on_empty_input() {
        let signals = extract("", None);
        assert!(!signals.multimodal);
        assert_eq!(signals.stakes, Stakes::Medium);
        assert_eq!(signals.ambiguity, Ambiguity::Low);
        assert_eq!(signals.context_size, ContextSize::Short);
        assert_eq!(signals.task_type, TaskType::Other);
        assert_eq!(signals.complexity, Complexity::Simple);
    }

    #[test]
    fn test_screenshot_marks_multimodal() {
        let signals = extract("What does this screenshot show?", None);
        assert!(signals.multimodal);
    }

    #[test]
    fn test_base64_marker_matches_as_substring() {
        let signals = extract("data:image/png;base64,iVBORw0KGgo", None);
        assert!(signals.multimodal);
    }

    #[test]
    fn test_plain_text_is_not_multimodal() {
        let signals = extract("Rewrite this paragraph in a friendlier tone.", None);
        assert!(!signals.multimodal);
    }

    #[test]
    fn test_context_participates_in_detection() {
        let signals = extract("What is wrong here?", Some("attached video recording"));
        assert!(signals.multimodal);
    }

    #[test]
    fn test_high_stakes_keywords() {
        let signals = extract("This is a production outage, what should we roll back?", None);
        assert_eq!(signals.stakes, Stakes::High);
    }

    #[test]
    fn test_low_stakes_keywords() {
        let signals = extract("Just a quick draft of a limerick please", None);
        assert_eq!(signals.stakes, Stakes::Low);
    }

    #[test]
    fn test_vague_language_raises_ambiguity() {
        let signals = extract("Do something with this stuff, not sure what exactly", None);
        assert_eq!(signals.ambiguity, Ambiguity::High);
    }

    #[test]
    fn test_task_type_classify() {
        let signals = extract("Classify these reviews as positive or negative", None);
        assert_eq!(signals.task_type, TaskType::Classify);
    }

    #[test]
    fn test_task_type_ties_fall_back_to_other() {
        // One classify keyword and one summarize keyword: no clear winner.
        let signals = extract("label this and give a tldr", None);
        assert_eq!(signals.task_type, TaskType::Other);
    }

    #[test]
    fn test_task_type_hit_count_wins() {
        let signals = extract("Write and rewrite this email as a short blog draft", None);
        assert_eq!(signals.task_type, TaskType::Write);
    }

    #[test]
    fn test_strict_output_detection() {
        assert!(extract("Reply with JSON only", None).strict_output);
        assert!(extract("Answer in the exact format below", None).strict_output);
        assert!(!extract("Reply however you like", None).strict_output);
    }

    #[test]
    fn test_code_fences_raise_complexity() {
        let prompt = "Fix this:\n```rust\nfn main() {}\n```";
        let signals = extract(prompt, None);
        assert_eq!(signals.complexity, Complexity::Moderate);
    }

    #[test]
    fn test_complexity_accumulates_to_complex() {
        let prompt = "Why does this deadlock? How would you refactor it? \
                      ```rust\nloop {}\n```";
        let signals = extract(prompt, None);
        assert_eq!(signals.complexity, Complexity::Complex);
    }

    #[test]
    fn test_long_context_bucket() {
        let long = "word ".repeat(2500);
        let signals = extract("Summarize this", Some(&long));
        assert_eq!(signals.context_size, ContextSize::Long);
    }

    #[test]
    fn test_signals_serialize_for_audit() {
        let signals = extract("classify this", None);
        let json = serde_json::to_string(&signals).unwrap();
        assert!(json.contains("\"task_type\":\"classify\""));
    }
}
