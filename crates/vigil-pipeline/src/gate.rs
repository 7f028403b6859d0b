//! Threshold gate turning verdicts into alerts

use vigil_common::{Severity, SignalDomain, ThreatLevel, Verdict};

use crate::alert::Alert;

/// Default source descriptor for text-domain alerts
pub const TEXT_SOURCE: &str = "Email Analysis";

/// Default source descriptor for network-domain alerts
pub const NETWORK_SOURCE: &str = "Network Analysis";

/// Confidence thresholds per domain
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// Text verdicts alert only above this confidence
    pub text_alert_threshold: f64,
    /// Text alerts above this confidence escalate to high severity
    pub text_high_severity: f64,
    /// Network verdicts alert only above this confidence
    pub network_alert_threshold: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            text_alert_threshold: 0.6,
            text_high_severity: 0.8,
            network_alert_threshold: 0.5,
        }
    }
}

/// Maps verdicts to alert-creation decisions
///
/// Negative verdicts never alert, whatever their confidence.
pub struct DecisionGate {
    config: GateConfig,
}

impl DecisionGate {
    /// Gate with the default thresholds
    pub fn new() -> Self {
        Self::with_config(GateConfig::default())
    }

    /// Gate with explicit thresholds
    pub fn with_config(config: GateConfig) -> Self {
        Self { config }
    }

    /// Decide on a text-domain verdict
    pub fn decide_text(&self, verdict: &Verdict) -> Option<Alert> {
        if !verdict.is_positive || verdict.confidence <= self.config.text_alert_threshold {
            return None;
        }
        let severity = if verdict.confidence > self.config.text_high_severity {
            Severity::High
        } else {
            Severity::Medium
        };
        Some(Alert::new(
            SignalDomain::Text,
            verdict.label.clone(),
            verdict.confidence,
            severity,
            format!(
                "AI-detected phishing email with {}% confidence",
                verdict.confidence_pct()
            ),
            TEXT_SOURCE,
        ))
    }

    /// Decide on a network-domain verdict
    pub fn decide_network(&self, verdict: &Verdict) -> Option<Alert> {
        if !verdict.is_positive || verdict.confidence <= self.config.network_alert_threshold {
            return None;
        }
        Some(Alert::new(
            SignalDomain::Network,
            verdict.label.clone(),
            verdict.confidence,
            severity_for(verdict.threat_level),
            format!(
                "Network intrusion detected: {} ({}% confidence)",
                verdict.label,
                verdict.confidence_pct()
            ),
            NETWORK_SOURCE,
        ))
    }
}

impl Default for DecisionGate {
    fn default() -> Self {
        Self::new()
    }
}

// Critical collapses into high severity at this boundary.
fn severity_for(level: ThreatLevel) -> Severity {
    match level {
        ThreatLevel::Critical | ThreatLevel::High => Severity::High,
        ThreatLevel::Medium => Severity::Medium,
        ThreatLevel::Low => Severity::Low,
    }
}
