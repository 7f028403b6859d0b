//! Vigil Classification Core
//!
//! Heuristic threat classification for two independent domains, with an
//! optional trained-model path on the text side.
//!
//! ## Components
//!
//! - **Feature Extraction**: tolerant parsing into canonical records; degrades
//!   to defaults instead of failing
//! - **Text Scorer**: keyword/category pattern scoring over message content
//! - **Signature Engine**: ordered attack signatures over connection records
//! - **Ensemble**: reconciles heuristic and model verdicts for text
//!
//! ## Flow
//!
//! raw input → extraction → heuristic scorer \[+ model for text\] →
//! ensemble (text only) → [`vigil_common::Verdict`]

pub mod ensemble;
pub mod features;
pub mod network;
pub mod text;

pub use ensemble::EnsemblePolicy;
pub use features::{
    extract_network, ExtractedRecord, FeatureRecord, RecordOrigin, TextSample, MAX_SAMPLE_BYTES,
};
pub use network::{AttackSignature, SignatureEngine, ATTACK_THRESHOLD};
pub use text::{PatternCategory, TextScorer, PHISHING_THRESHOLD};

use std::sync::Arc;

use vigil_common::{SignalTrace, Verdict, VigilResult};
use vigil_ml::{ModelStatus, TextModel};

/// Text-domain classifier: heuristic scorer plus optional model, reconciled
pub struct TextClassifier {
    scorer: TextScorer,
    model: Option<Arc<dyn TextModel>>,
    policy: EnsemblePolicy,
}

impl TextClassifier {
    /// Heuristic-only classifier
    pub fn new() -> Self {
        Self {
            scorer: TextScorer::new(),
            model: None,
            policy: EnsemblePolicy::default(),
        }
    }

    /// Attach a model adapter; its verdicts are reconciled per the policy
    pub fn with_model(mut self, model: Arc<dyn TextModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Override the reconciliation thresholds
    pub fn with_policy(mut self, policy: EnsemblePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Classify a bounded sample
    pub fn classify(&self, sample: &TextSample) -> Verdict {
        let heuristic = self.scorer.classify(sample);
        let model = self.model_verdict(sample);
        self.policy.reconcile(&heuristic, model.as_ref())
    }

    /// Bound-check raw text, then classify it
    pub fn classify_str(&self, text: &str) -> VigilResult<Verdict> {
        let sample = TextSample::new(text)?;
        Ok(self.classify(&sample))
    }

    /// Readiness of the attached model adapter, if any
    pub fn model_status(&self) -> ModelStatus {
        match &self.model {
            Some(model) => model.status(),
            None => ModelStatus::unavailable("no model configured"),
        }
    }

    fn model_verdict(&self, sample: &TextSample) -> Option<Verdict> {
        let model = self.model.as_ref()?;
        if !model.ready() {
            return None;
        }
        let prediction = model.predict(sample.as_str())?;
        Some(Verdict::new(
            prediction.is_positive,
            prediction.label.clone(),
            prediction.confidence,
            text::confidence_tier(prediction.is_positive, prediction.confidence),
            vec![SignalTrace::new(
                "model",
                "class probability",
                prediction.confidence,
            )],
        ))
    }
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Network-domain classifier over connection records
pub struct NetworkClassifier {
    engine: SignatureEngine,
}

impl NetworkClassifier {
    /// Classifier with the default signature set
    pub fn new() -> Self {
        Self {
            engine: SignatureEngine::new(),
        }
    }

    /// Extract a record from raw input and classify it; never rejects
    pub fn classify_raw(&self, raw: &str) -> Verdict {
        let extracted = extract_network(raw);
        self.engine.classify(&extracted.record)
    }

    /// Classify an already-extracted record
    pub fn classify_record(&self, record: &FeatureRecord) -> Verdict {
        self.engine.classify(record)
    }
}

impl Default for NetworkClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_ml::ModelPrediction;

    struct FixedModel {
        prediction: ModelPrediction,
    }

    impl TextModel for FixedModel {
        fn ready(&self) -> bool {
            true
        }

        fn predict(&self, _text: &str) -> Option<ModelPrediction> {
            Some(self.prediction.clone())
        }

        fn status(&self) -> ModelStatus {
            ModelStatus::ready("fixed prediction")
        }
    }

    #[test]
    fn heuristic_only_classifier_reports_no_model() {
        let classifier = TextClassifier::new();
        let status = classifier.model_status();

        assert!(!status.ready);
        assert_eq!(status.detail, "no model configured");
    }

    #[test]
    fn strong_heuristics_beat_a_dissenting_model() {
        let model = FixedModel {
            prediction: ModelPrediction {
                is_positive: false,
                label: "legitimate".to_string(),
                confidence: 0.9,
                probabilities: vec![0.9, 0.1],
            },
        };
        let classifier = TextClassifier::new().with_model(Arc::new(model));

        let verdict = classifier
            .classify_str("urgent action: verify account, click here immediately")
            .unwrap();

        assert!(verdict.is_positive);
        assert_eq!(verdict.label, "phishing");
        assert!(verdict.sources.iter().any(|s| s.id == "model"));
    }

    #[test]
    fn quiet_text_takes_the_model_verdict() {
        let model = FixedModel {
            prediction: ModelPrediction {
                is_positive: true,
                label: "phishing".to_string(),
                confidence: 0.8,
                probabilities: vec![0.2, 0.8],
            },
        };
        let classifier = TextClassifier::new().with_model(Arc::new(model));

        let verdict = classifier.classify_str("meeting notes attached").unwrap();

        assert!(verdict.is_positive);
        assert_eq!(verdict.confidence, 0.8);
    }

    #[test]
    fn network_facade_degrades_raw_garbage_to_normal() {
        let classifier = NetworkClassifier::new();
        let verdict = classifier.classify_raw("hello world");

        assert!(!verdict.is_positive);
        assert_eq!(verdict.label, "normal");
    }

    #[test]
    fn network_facade_classifies_a_positional_row() {
        let mut fields = vec!["0".to_string(); 41];
        fields[1] = "tcp".to_string();
        fields[2] = "private".to_string();
        fields[3] = "REJ".to_string();
        fields[22] = "150".to_string();

        let classifier = NetworkClassifier::new();
        let verdict = classifier.classify_raw(&fields.join(","));

        assert!(verdict.is_positive);
        assert_eq!(verdict.label, "portsweep");
    }
}
