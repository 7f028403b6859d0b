//! Reconciliation of heuristic and model verdicts for the text domain
//!
//! The network domain has no model path; that asymmetry is intentional. The
//! policy trusts strong lexical evidence over the model outright, and lets
//! moderate lexical evidence override a negative model call. It trades
//! precision for recall when known phrasing patterns are present.

use vigil_common::{SignalTrace, Verdict};

use crate::text::confidence_tier;

/// Thresholds governing when heuristics override the model
#[derive(Debug, Clone, Copy)]
pub struct EnsemblePolicy {
    /// Heuristic confidence above which the heuristic verdict wins outright
    pub heuristic_override: f64,
    /// Heuristic confidence above which a negative model call is overridden
    pub moderate_override: f64,
    /// Weight of the model's confidence inside a heuristic override
    pub model_discount: f64,
}

impl Default for EnsemblePolicy {
    fn default() -> Self {
        Self {
            heuristic_override: 0.6,
            moderate_override: 0.4,
            model_discount: 0.5,
        }
    }
}

impl EnsemblePolicy {
    /// Merge a heuristic verdict with an optional model verdict
    ///
    /// Rules apply in order; the first that holds decides the outcome:
    /// 1. positive heuristic above `heuristic_override` wins outright, with
    ///    model confidence counted at `model_discount` weight;
    /// 2. positive heuristic above `moderate_override` overrides a negative
    ///    model call, averaging its confidence against the model's doubt;
    /// 3. otherwise the model verdict stands;
    /// 4. with no model verdict the heuristic verdict stands.
    pub fn reconcile(&self, heuristic: &Verdict, model: Option<&Verdict>) -> Verdict {
        let Some(model) = model else {
            return heuristic.clone();
        };

        if heuristic.is_positive && heuristic.confidence > self.heuristic_override {
            let confidence = heuristic
                .confidence
                .max(model.confidence * self.model_discount);
            return Verdict::new(
                true,
                heuristic.label.clone(),
                confidence,
                confidence_tier(true, confidence),
                merged_sources(heuristic, model),
            );
        }

        if !model.is_positive
            && heuristic.is_positive
            && heuristic.confidence > self.moderate_override
        {
            let confidence = (heuristic.confidence + (1.0 - model.confidence)) / 2.0;
            return Verdict::new(
                true,
                heuristic.label.clone(),
                confidence,
                confidence_tier(true, confidence),
                merged_sources(heuristic, model),
            );
        }

        model.clone()
    }
}

fn merged_sources(heuristic: &Verdict, model: &Verdict) -> Vec<SignalTrace> {
    let mut sources = heuristic.sources.clone();
    sources.extend(model.sources.iter().cloned());
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vigil_common::{ThreatLevel, CONFIDENCE_CEILING, CONFIDENCE_FLOOR};

    fn heuristic(is_positive: bool, confidence: f64) -> Verdict {
        let label = if is_positive { "phishing" } else { "legitimate" };
        let sources = vec![
            SignalTrace::new("strong:verify account", "matched \"verify account\"", 25.0),
            SignalTrace::new("medium:urgent", "matched \"urgent\"", 15.0),
        ];
        Verdict::new(
            is_positive,
            label,
            confidence,
            confidence_tier(is_positive, confidence),
            sources,
        )
    }

    fn model(is_positive: bool, confidence: f64) -> Verdict {
        let label = if is_positive { "phishing" } else { "legitimate" };
        let sources = vec![SignalTrace::new("model", "class probability", confidence)];
        Verdict::new(
            is_positive,
            label,
            confidence,
            confidence_tier(is_positive, confidence),
            sources,
        )
    }

    #[test]
    fn absent_model_leaves_the_heuristic_verdict_unchanged() {
        let h = heuristic(true, 0.7);
        let out = EnsemblePolicy::default().reconcile(&h, None);
        assert_eq!(out, h);
    }

    #[test]
    fn strong_heuristic_overrides_a_confident_negative_model() {
        let h = heuristic(true, 0.7);
        let m = model(false, 0.9);
        let out = EnsemblePolicy::default().reconcile(&h, Some(&m));

        assert!(out.is_positive);
        assert_eq!(out.label, "phishing");
        // max(0.7, 0.9 * 0.5)
        assert_eq!(out.confidence, 0.7);
        assert_eq!(out.threat_level, ThreatLevel::Medium);
    }

    #[test]
    fn override_keeps_both_verdicts_traces() {
        let h = heuristic(true, 0.7);
        let m = model(false, 0.9);
        let out = EnsemblePolicy::default().reconcile(&h, Some(&m));

        assert_eq!(out.sources.len(), 3);
        assert!(out.sources.iter().any(|s| s.id == "model"));
    }

    #[test]
    fn moderate_heuristic_overrides_a_negative_model_by_averaging() {
        let h = heuristic(true, 0.5);
        let m = model(false, 0.9);
        let out = EnsemblePolicy::default().reconcile(&h, Some(&m));

        assert!(out.is_positive);
        // (0.5 + (1 - 0.9)) / 2
        assert!((out.confidence - 0.3).abs() < 1e-9);
        assert_eq!(out.threat_level, ThreatLevel::Medium);
    }

    #[test]
    fn weak_heuristic_defers_to_a_negative_model() {
        let h = heuristic(true, 0.3);
        let m = model(false, 0.9);
        let out = EnsemblePolicy::default().reconcile(&h, Some(&m));

        assert_eq!(out, m);
        assert!(!out.is_positive);
    }

    #[test]
    fn positive_model_stands_when_the_heuristic_found_nothing() {
        let h = heuristic(false, 0.1);
        let m = model(true, 0.8);
        let out = EnsemblePolicy::default().reconcile(&h, Some(&m));

        assert_eq!(out, m);
        assert!(out.is_positive);
    }

    #[test]
    fn agreeing_positives_keep_the_heuristic_label_and_confidence() {
        let h = heuristic(true, 0.8);
        let m = model(true, 0.9);
        let out = EnsemblePolicy::default().reconcile(&h, Some(&m));

        assert!(out.is_positive);
        assert_eq!(out.confidence, 0.8);
        assert_eq!(out.label, "phishing");
    }

    proptest! {
        #[test]
        fn reconciled_confidence_stays_in_bounds(
            h_conf in 0.1f64..0.98,
            m_conf in 0.1f64..0.98,
            h_pos: bool,
            m_pos: bool,
        ) {
            let h = heuristic(h_pos, h_conf);
            let m = model(m_pos, m_conf);
            let out = EnsemblePolicy::default().reconcile(&h, Some(&m));

            prop_assert!(out.confidence >= CONFIDENCE_FLOOR);
            prop_assert!(out.confidence <= CONFIDENCE_CEILING);
        }
    }
}
