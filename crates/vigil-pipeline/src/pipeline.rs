//! End-to-end scan orchestration
//!
//! One pipeline owns both classifiers, the gate, the sink, and the
//! broadcaster. Every accepted alert is persisted exactly once, synchronously
//! before broadcast, whether it came from a scan or from an external source.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use vigil_classify::{FeatureRecord, NetworkClassifier, TextClassifier, TextSample};
use vigil_common::{Verdict, VigilResult};
use vigil_ml::{ModelStatus, TextModel};

use crate::alert::Alert;
use crate::broadcast::{AlertBroadcaster, Subscription};
use crate::gate::{DecisionGate, GateConfig};
use crate::sink::{AlertSink, MemorySink};

/// Outcome of one scan
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// The classification verdict
    pub verdict: Verdict,
    /// The alert the gate accepted, if any
    pub alert: Option<Arc<Alert>>,
}

/// Counters across the pipeline's lifetime
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// Text scans performed
    pub text_scans: AtomicU64,
    /// Network scans performed
    pub network_scans: AtomicU64,
    /// Alerts accepted by the gate or ingested externally
    pub alerts_created: AtomicU64,
    /// Alerts handed in through `ingest_alert`
    pub alerts_ingested: AtomicU64,
}

/// Classification core wired to gate, sink, and broadcaster
pub struct ThreatPipeline {
    text: TextClassifier,
    network: NetworkClassifier,
    gate: DecisionGate,
    sink: Arc<dyn AlertSink>,
    broadcaster: AlertBroadcaster,
    stats: PipelineStats,
}

impl ThreatPipeline {
    /// Pipeline with default thresholds, no model, and an in-memory sink
    pub fn new() -> Self {
        Self {
            text: TextClassifier::new(),
            network: NetworkClassifier::new(),
            gate: DecisionGate::new(),
            sink: Arc::new(MemorySink::new()),
            broadcaster: AlertBroadcaster::new(),
            stats: PipelineStats::default(),
        }
    }

    /// Replace the persistence collaborator
    pub fn with_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Attach a text model adapter
    pub fn with_model(mut self, model: Arc<dyn TextModel>) -> Self {
        self.text = self.text.with_model(model);
        self
    }

    /// Override the gate thresholds
    pub fn with_gate(mut self, config: GateConfig) -> Self {
        self.gate = DecisionGate::with_config(config);
        self
    }

    /// Classify text; oversized input is rejected before any processing
    pub async fn scan_text(&self, text: &str) -> VigilResult<ScanOutcome> {
        let sample = TextSample::new(text)?;
        self.stats.text_scans.fetch_add(1, Ordering::Relaxed);

        let verdict = self.text.classify(&sample);
        let alert = match self.gate.decide_text(&verdict) {
            Some(alert) => Some(self.emit(alert).await?),
            None => None,
        };
        Ok(ScanOutcome { verdict, alert })
    }

    /// Classify raw network input; never rejects, the result only carries
    /// sink failures
    pub async fn scan_network_raw(&self, raw: &str) -> VigilResult<ScanOutcome> {
        self.stats.network_scans.fetch_add(1, Ordering::Relaxed);
        let verdict = self.network.classify_raw(raw);
        self.finish_network(verdict).await
    }

    /// Classify an already-extracted feature record
    pub async fn scan_network_record(&self, record: &FeatureRecord) -> VigilResult<ScanOutcome> {
        self.stats.network_scans.fetch_add(1, Ordering::Relaxed);
        let verdict = self.network.classify_record(record);
        self.finish_network(verdict).await
    }

    /// Hand an externally produced alert through the same persistence and
    /// broadcast path as organic alerts
    pub async fn ingest_alert(&self, alert: Alert) -> VigilResult<Arc<Alert>> {
        self.stats.alerts_ingested.fetch_add(1, Ordering::Relaxed);
        self.emit(alert).await
    }

    /// Register a broadcast subscriber
    pub fn subscribe(&self) -> Subscription {
        self.broadcaster.subscribe()
    }

    /// Readiness of the text model adapter
    pub fn model_status(&self) -> ModelStatus {
        self.text.model_status()
    }

    /// Lifetime counters
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// The alert fan-out
    pub fn broadcaster(&self) -> &AlertBroadcaster {
        &self.broadcaster
    }

    async fn finish_network(&self, verdict: Verdict) -> VigilResult<ScanOutcome> {
        let alert = match self.gate.decide_network(&verdict) {
            Some(alert) => Some(self.emit(alert).await?),
            None => None,
        };
        Ok(ScanOutcome { verdict, alert })
    }

    // Persist first; only what the sink accepted is broadcast.
    async fn emit(&self, alert: Alert) -> VigilResult<Arc<Alert>> {
        let persisted = self.sink.store(alert).await?;
        let alert = Arc::new(persisted.alert);
        self.stats.alerts_created.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            alert = %alert.id,
            label = %alert.label,
            severity = %alert.severity,
            sequence = persisted.sequence,
            "alert created"
        );
        self.broadcaster.publish(&alert);
        Ok(alert)
    }
}

impl Default for ThreatPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_common::{Severity, SignalDomain, VigilError};

    fn neptune_row() -> String {
        let mut fields = vec!["0".to_string(); 41];
        fields[1] = "tcp".to_string();
        fields[3] = "S0".to_string();
        fields[22] = "150".to_string();
        fields.join(",")
    }

    #[tokio::test]
    async fn phishing_scan_persists_then_broadcasts() {
        let sink = Arc::new(MemorySink::new());
        let pipeline = ThreatPipeline::new().with_sink(sink.clone());
        let mut sub = pipeline.subscribe();

        let outcome = pipeline
            .scan_text(
                "urgent action verify account paypal password reset click here immediately \
                 click here lottery winner free money guaranteed",
            )
            .await
            .unwrap();

        let alert = outcome.alert.expect("gate should accept");
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.label, "phishing");
        assert_eq!(
            alert.description,
            "AI-detected phishing email with 98% confidence"
        );
        assert_eq!(sink.len(), 1);
        assert_eq!(sub.try_recv().unwrap().id, alert.id);
    }

    #[tokio::test]
    async fn low_confidence_positive_creates_no_alert() {
        let sink = Arc::new(MemorySink::new());
        let pipeline = ThreatPipeline::new().with_sink(sink.clone());

        let outcome = pipeline.scan_text("your account locked").await.unwrap();

        assert!(outcome.verdict.is_positive);
        assert!(outcome.alert.is_none());
        assert!(sink.is_empty());
        assert_eq!(pipeline.stats().alerts_created.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn oversized_text_is_rejected_before_scanning() {
        let pipeline = ThreatPipeline::new();
        let oversized = "a".repeat(vigil_classify::MAX_SAMPLE_BYTES + 1);

        let err = pipeline.scan_text(&oversized).await.unwrap_err();

        assert!(matches!(err, VigilError::InputTooLarge { .. }));
        assert_eq!(pipeline.stats().text_scans.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn syn_flood_row_alerts_at_high_severity() {
        let pipeline = ThreatPipeline::new();
        let mut sub = pipeline.subscribe();

        let outcome = pipeline.scan_network_raw(&neptune_row()).await.unwrap();

        let alert = outcome.alert.expect("gate should accept");
        assert_eq!(alert.domain, SignalDomain::Network);
        // Critical threat level collapses to high severity at the gate.
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(
            alert.description,
            "Network intrusion detected: neptune (90% confidence)"
        );
        assert_eq!(sub.try_recv().unwrap().id, alert.id);
    }

    #[tokio::test]
    async fn unparseable_network_input_scores_normal_without_alerting() {
        let sink = Arc::new(MemorySink::new());
        let pipeline = ThreatPipeline::new().with_sink(sink.clone());

        let outcome = pipeline.scan_network_raw("not a record").await.unwrap();

        assert!(!outcome.verdict.is_positive);
        assert_eq!(outcome.verdict.label, "normal");
        assert!(outcome.alert.is_none());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn ingested_alerts_share_the_organic_path() {
        let sink = Arc::new(MemorySink::new());
        let pipeline = ThreatPipeline::new().with_sink(sink.clone());
        let mut sub = pipeline.subscribe();

        let drill = Alert::new(
            SignalDomain::Network,
            "autonomous_malware",
            0.82,
            Severity::Critical,
            "AI-powered attack detected from automated monitoring",
            "192.168.1.77",
        );
        let published = pipeline.ingest_alert(drill).await.unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sub.try_recv().unwrap().id, published.id);
        assert_eq!(pipeline.stats().alerts_ingested.load(Ordering::Relaxed), 1);
        assert_eq!(pipeline.stats().alerts_created.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn model_status_reports_the_missing_adapter() {
        let pipeline = ThreatPipeline::new();
        let status = pipeline.model_status();

        assert!(!status.ready);
        assert_eq!(status.detail, "no model configured");
    }

    #[tokio::test]
    async fn scans_count_per_domain() {
        let pipeline = ThreatPipeline::new();

        pipeline.scan_text("hello").await.unwrap();
        pipeline.scan_network_raw("x").await.unwrap();
        pipeline
            .scan_network_record(&FeatureRecord::default())
            .await
            .unwrap();

        assert_eq!(pipeline.stats().text_scans.load(Ordering::Relaxed), 1);
        assert_eq!(pipeline.stats().network_scans.load(Ordering::Relaxed), 2);
    }
}
