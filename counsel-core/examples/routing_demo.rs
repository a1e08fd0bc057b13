//! Offline demo of the routing pipeline.
//!
//! Runs the heuristic classifier over a handful of sample prompts and
//! prints each decision with its audit trail. No network access and no
//! credentials needed; availability is simulated.
//!
//! Run with: cargo run --example routing_demo

use anyhow::Result;

use counsel_core::routing::{
    escalate_on_low_confidence, extract, resolve, Classifier, HeuristicClassifier,
    ProviderAvailability,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let availability = ProviderAvailability {
        openai: true,
        google: true,
    };
    let classifier = HeuristicClassifier::new();

    let prompts = [
        "Classify this review as positive or negative",
        "What does this screenshot of the billing page show?",
        "Write a short friendly email announcing the team picnic",
        "Compare these two database designs and decide which scales better",
        "This production incident report has a screenshot, what went wrong?",
    ];

    for prompt in prompts {
        let signals = extract(prompt, None);
        let mut decision = classifier
            .classify(prompt, None, signals, availability)
            .await;
        resolve(&mut decision, availability)?;
        escalate_on_low_confidence(&mut decision, availability)?;

        println!("prompt:     {}", prompt);
        println!(
            "decision:   {} (confidence {:.2}, fallback {})",
            decision.selected, decision.confidence, decision.fallback
        );
        println!("task/stakes: {:?} / {:?}", decision.signals.task_type, decision.signals.stakes);
        println!("reason:     {}\n", decision.reason);
    }

    Ok(())
}
