//! End-to-end scan walkthrough
//!
//! Builds a pipeline with the in-memory sink and a small bundled model, scans
//! one phishing message and one connection record, pushes a synthetic drill
//! alert through the same path, then drains the subscription.
//!
//! Run with: cargo run -p vigil-pipeline --example scan

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vigil_ml::{BayesTextModel, ModelArtifact};
use vigil_pipeline::{AlertSink, MemorySink, SyntheticConfig, SyntheticSource, ThreatPipeline};

fn demo_artifact() -> ModelArtifact {
    let mut vocabulary = HashMap::new();
    for token in ["meeting", "agenda", "minutes", "invoice", "quarterly"] {
        vocabulary.insert(token.to_string(), [30, 2]);
    }
    for token in ["verify", "account", "urgent", "password", "suspended", "click"] {
        vocabulary.insert(token.to_string(), [2, 30]);
    }
    ModelArtifact {
        classes: ["legitimate".to_string(), "phishing".to_string()],
        class_counts: [40, 40],
        vocabulary,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let sink = Arc::new(MemorySink::new());
    let model = BayesTextModel::from_artifact(demo_artifact(), 512)?;
    let pipeline = Arc::new(
        ThreatPipeline::new()
            .with_sink(sink.clone() as Arc<dyn AlertSink>)
            .with_model(Arc::new(model)),
    );
    let mut subscription = pipeline.subscribe();

    let status = pipeline.model_status();
    println!("model ready: {} ({})", status.ready, status.detail);

    let text_outcome = pipeline
        .scan_text("URGENT ACTION: verify account now, click here immediately")
        .await?;
    println!(
        "text verdict: {} (confidence {:.2}, {} contributing rules)",
        text_outcome.verdict.label,
        text_outcome.verdict.confidence,
        text_outcome.verdict.sources.len()
    );

    let row = concat!(
        "0,tcp,private,S0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,",
        "0,0,150,150,0.99,0.99,0,0,0.05,0.06,0,255,20,0.08,0.07,0,0,1,1,0,0"
    );
    let network_outcome = pipeline.scan_network_raw(row).await?;
    println!(
        "network verdict: {} / {}",
        network_outcome.verdict.label, network_outcome.verdict.threat_level
    );

    // One synthetic drill alert through the same ingest path.
    let drill = SyntheticSource::new(SyntheticConfig {
        probability: 1.0,
        ..SyntheticConfig::default()
    });
    if let Some(alert) = drill.maybe_generate() {
        pipeline.ingest_alert(alert).await?;
    }

    while let Some(alert) = subscription.try_recv() {
        println!("alert [{}] {}: {}", alert.severity, alert.label, alert.description);
    }
    println!("stored alerts: {}", sink.len());

    Ok(())
}
