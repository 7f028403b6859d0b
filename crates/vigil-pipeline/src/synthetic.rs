//! Periodic synthetic alert source
//!
//! Emits drill alerts for automated-monitoring simulations. Downstream they
//! are indistinguishable from organically classified alerts: they take the
//! same ingest, persistence, and broadcast path.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use vigil_common::{Severity, SignalDomain};

use crate::alert::Alert;
use crate::pipeline::ThreatPipeline;

const THREAT_TYPES: &[&str] = &["deepfake", "autonomous_malware", "ai_phishing"];

const SEVERITIES: &[Severity] = &[
    Severity::Critical,
    Severity::High,
    Severity::Medium,
    Severity::Low,
];

/// Timing and probability of synthetic emission
#[derive(Debug, Clone, Copy)]
pub struct SyntheticConfig {
    /// Tick period
    pub period: Duration,
    /// Emission probability per tick
    pub probability: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(30),
            probability: 0.1,
        }
    }
}

/// Generator of drill alerts
pub struct SyntheticSource {
    config: SyntheticConfig,
}

impl SyntheticSource {
    /// Source with the given timing
    pub fn new(config: SyntheticConfig) -> Self {
        Self { config }
    }

    /// Build one synthetic alert
    pub fn generate(&self) -> Alert {
        let mut rng = rand::thread_rng();
        let threat_type = THREAT_TYPES[rng.gen_range(0..THREAT_TYPES.len())];
        let severity = SEVERITIES[rng.gen_range(0..SEVERITIES.len())];
        let confidence = rng.gen::<f64>() * 0.3 + 0.7;
        let domain = if threat_type == "ai_phishing" {
            SignalDomain::Text
        } else {
            SignalDomain::Network
        };

        Alert::new(
            domain,
            threat_type,
            confidence,
            severity,
            "AI-powered attack detected from automated monitoring",
            format!("192.168.1.{}", rng.gen_range(0..255)),
        )
    }

    /// Roll the per-tick probability; emit an alert when it hits
    pub fn maybe_generate(&self) -> Option<Alert> {
        if rand::thread_rng().gen::<f64>() < self.config.probability {
            Some(self.generate())
        } else {
            None
        }
    }

    /// Drive the source on its own task, feeding the pipeline's ingest path
    pub fn spawn(self, pipeline: Arc<ThreatPipeline>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick fires immediately; consume it so emission starts
            // after one full period.
            ticker.tick().await;
            tracing::debug!(period_secs = self.config.period.as_secs(), "synthetic source running");
            loop {
                ticker.tick().await;
                if let Some(alert) = self.maybe_generate() {
                    tracing::info!(label = %alert.label, severity = %alert.severity, "synthetic alert emitted");
                    if let Err(err) = pipeline.ingest_alert(alert).await {
                        tracing::warn!(error = %err, "synthetic alert was not stored");
                    }
                }
            }
        })
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(SyntheticConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{AlertSink, MemorySink};

    #[test]
    fn generated_alerts_stay_inside_the_drill_catalog() {
        let source = SyntheticSource::default();

        for _ in 0..200 {
            let alert = source.generate();

            assert!(THREAT_TYPES.contains(&alert.label.as_str()));
            assert!(SEVERITIES.contains(&alert.severity));
            assert!(alert.confidence >= 0.7 && alert.confidence < 1.0);
            assert_eq!(
                alert.description,
                "AI-powered attack detected from automated monitoring"
            );
            let octet = alert
                .source
                .strip_prefix("192.168.1.")
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap();
            assert!(octet < 255);

            match alert.label.as_str() {
                "ai_phishing" => assert_eq!(alert.domain, SignalDomain::Text),
                _ => assert_eq!(alert.domain, SignalDomain::Network),
            }
        }
    }

    #[test]
    fn probability_bounds_gate_emission() {
        let never = SyntheticSource::new(SyntheticConfig {
            period: Duration::from_secs(30),
            probability: 0.0,
        });
        assert!((0..100).all(|_| never.maybe_generate().is_none()));

        let always = SyntheticSource::new(SyntheticConfig {
            period: Duration::from_secs(30),
            probability: 1.0,
        });
        assert!(always.maybe_generate().is_some());
    }

    #[tokio::test]
    async fn spawned_source_feeds_the_ingest_path() {
        let sink = Arc::new(MemorySink::new());
        let pipeline = Arc::new(ThreatPipeline::new().with_sink(sink.clone() as Arc<dyn AlertSink>));
        let source = SyntheticSource::new(SyntheticConfig {
            period: Duration::from_millis(20),
            probability: 1.0,
        });

        let handle = source.spawn(Arc::clone(&pipeline));
        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.abort();

        let ingested = pipeline
            .stats()
            .alerts_ingested
            .load(std::sync::atomic::Ordering::Relaxed);
        assert!(sink.len() >= 2, "expected repeated drills, saw {}", sink.len());
        assert!(ingested >= 2, "expected repeated ingests, saw {ingested}");
    }
}
