//! Alert types emitted by the decision gate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vigil_common::{Severity, SignalDomain};

/// An alert accepted by the decision gate
///
/// Immutable once created. Ownership passes to the sink and the broadcaster;
/// the same classification call never re-emits it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    /// Unique alert id
    pub id: Uuid,
    /// Domain of the verdict behind this alert
    pub domain: SignalDomain,
    /// Attack label ("phishing", "neptune", "deepfake", ...)
    pub label: String,
    /// Final confidence behind the gate decision
    pub confidence: f64,
    /// Severity tier assigned by the gate
    pub severity: Severity,
    /// Human-readable summary for downstream consumers
    pub description: String,
    /// Where the offending signal came from
    pub source: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Build an alert with a fresh id and the current timestamp
    pub fn new(
        domain: SignalDomain,
        label: impl Into<String>,
        confidence: f64,
        severity: Severity,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain,
            label: label.into(),
            confidence,
            severity,
            description: description.into(),
            source: source.into(),
            created_at: Utc::now(),
        }
    }
}

/// An alert after the persistence collaborator accepted it
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedAlert {
    /// The stored alert, unchanged
    pub alert: Alert,
    /// Monotonic sequence assigned by the sink
    pub sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alerts_get_distinct_ids() {
        let a = Alert::new(
            SignalDomain::Text,
            "phishing",
            0.9,
            Severity::High,
            "AI-detected phishing email with 90% confidence",
            "Email Analysis",
        );
        let b = Alert::new(
            SignalDomain::Text,
            "phishing",
            0.9,
            Severity::High,
            "AI-detected phishing email with 90% confidence",
            "Email Analysis",
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn alert_serializes_with_lowercase_enums() {
        let alert = Alert::new(
            SignalDomain::Network,
            "neptune",
            0.9,
            Severity::High,
            "Network intrusion detected: neptune (90% confidence)",
            "Network Analysis",
        );
        let json = serde_json::to_value(&alert).unwrap();

        assert_eq!(json["domain"], "network");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["label"], "neptune");
    }
}
