//! Verdict and severity types shared by both classification domains

use serde::{Deserialize, Serialize};

/// Lower bound on any reported confidence
pub const CONFIDENCE_FLOOR: f64 = 0.1;

/// Upper bound on any reported confidence
pub const CONFIDENCE_CEILING: f64 = 0.98;

/// Threat level assigned by a classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    /// Benign or below the alerting tier
    Low = 0,
    /// Suspicious activity
    Medium = 1,
    /// Confirmed hostile pattern
    High = 2,
    /// Hostile pattern with immediate impact
    Critical = 3,
}

impl ThreatLevel {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "low",
            ThreatLevel::Medium => "medium",
            ThreatLevel::High => "high",
            ThreatLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tier carried by an alert
///
/// Distinct from [`ThreatLevel`]: severity is what the decision gate hands to
/// downstream consumers, and its mapping from threat level is gate policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational tier
    Low = 0,
    /// Needs triage
    Medium = 1,
    /// Needs prompt response
    High = 2,
    /// Needs immediate response
    Critical = 3,
}

impl Severity {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification domain a signal belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SignalDomain {
    /// Free-text message content
    Text,
    /// Network connection records
    Network,
}

impl SignalDomain {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDomain::Text => "text",
            SignalDomain::Network => "network",
        }
    }
}

/// One rule or signature that contributed to a verdict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalTrace {
    /// Stable id of the matching rule or signature
    pub id: String,
    /// Human-readable description of what matched
    pub description: String,
    /// Score contribution of this match
    pub weight: f64,
}

impl SignalTrace {
    /// Build a trace entry
    pub fn new(id: impl Into<String>, description: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            weight,
        }
    }
}

/// Structured output of a classification call
///
/// Immutable once produced. Confidence always lies in
/// `[CONFIDENCE_FLOOR, CONFIDENCE_CEILING]`; the constructor clamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    /// Whether the signal was classified as malicious
    pub is_positive: bool,
    /// Classification label ("phishing", "neptune", "normal", ...)
    pub label: String,
    /// Calibrated confidence in the classification
    pub confidence: f64,
    /// Threat level of the classified signal
    pub threat_level: ThreatLevel,
    /// Rules and signatures that contributed to this verdict
    pub sources: Vec<SignalTrace>,
}

impl Verdict {
    /// Build a verdict, clamping confidence into the legal range
    pub fn new(
        is_positive: bool,
        label: impl Into<String>,
        confidence: f64,
        threat_level: ThreatLevel,
        sources: Vec<SignalTrace>,
    ) -> Self {
        Self {
            is_positive,
            label: label.into(),
            confidence: confidence.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING),
            threat_level,
            sources,
        }
    }

    /// Negative verdict with the given label and the floor confidence
    pub fn negative(label: impl Into<String>, confidence: f64) -> Self {
        Self::new(false, label, confidence, ThreatLevel::Low, Vec::new())
    }

    /// Confidence as a rounded percentage, for alert descriptions
    pub fn confidence_pct(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}
