//! Naive-Bayes text classifier backed by a JSON vocabulary artifact

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vigil_common::{VigilError, VigilResult};

use crate::{ModelConfig, ModelPrediction, ModelStatus, TextModel};

/// Serialized model vocabulary
///
/// Class order is fixed: index 0 is the negative class, index 1 the positive
/// class. Per-token counts use the same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Class labels, negative class first
    pub classes: [String; 2],
    /// Training document count per class
    pub class_counts: [u64; 2],
    /// Token occurrence counts per class
    pub vocabulary: HashMap<String, [u64; 2]>,
}

impl ModelArtifact {
    /// Read and decode an artifact file
    pub fn from_file(path: &Path) -> VigilResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| VigilError::Artifact(e.to_string()))
    }
}

/// Naive-Bayes token classifier over a fixed two-class vocabulary
///
/// The vocabulary is loaded exactly once, at construction. Any load problem
/// leaves the adapter permanently not ready; there is no reload path.
pub struct BayesTextModel {
    artifact: Option<ModelArtifact>,
    max_tokens: usize,
    status: ModelStatus,
}

impl BayesTextModel {
    /// Load the artifact named by `config`
    ///
    /// Never fails: an absent path, a missing file, or an undecodable artifact
    /// produces an adapter that reports not ready and explains why.
    pub fn load(config: &ModelConfig) -> Self {
        let Some(path) = config.artifact_path.as_deref() else {
            return Self::unready("no artifact path configured", config.max_tokens);
        };

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "model artifact not found, text path runs heuristic-only"
            );
            return Self::unready("model artifact not found", config.max_tokens);
        }

        match ModelArtifact::from_file(path) {
            Ok(artifact) => match Self::validate(artifact) {
                Ok(artifact) => {
                    tracing::info!(
                        path = %path.display(),
                        tokens = artifact.vocabulary.len(),
                        "model artifact loaded"
                    );
                    Self {
                        status: ModelStatus::ready(format!(
                            "artifact loaded from {}",
                            path.display()
                        )),
                        max_tokens: config.max_tokens,
                        artifact: Some(artifact),
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "model artifact rejected");
                    Self::unready(e.to_string(), config.max_tokens)
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "model artifact unreadable");
                Self::unready(e.to_string(), config.max_tokens)
            }
        }
    }

    /// Build a ready adapter from an in-memory artifact
    ///
    /// Lets tests and demos exercise the ready path without touching the
    /// filesystem.
    pub fn from_artifact(artifact: ModelArtifact, max_tokens: usize) -> VigilResult<Self> {
        let artifact = Self::validate(artifact)?;
        let detail = format!("in-memory vocabulary ({} tokens)", artifact.vocabulary.len());
        Ok(Self {
            artifact: Some(artifact),
            max_tokens,
            status: ModelStatus::ready(detail),
        })
    }

    fn unready(detail: impl Into<String>, max_tokens: usize) -> Self {
        Self {
            artifact: None,
            max_tokens,
            status: ModelStatus::unavailable(detail),
        }
    }

    fn validate(artifact: ModelArtifact) -> Result<ModelArtifact, VigilError> {
        if artifact.class_counts[0] + artifact.class_counts[1] == 0 {
            return Err(VigilError::Artifact(
                "artifact has no training counts".to_string(),
            ));
        }
        Ok(artifact)
    }

    fn score(&self, text: &str) -> Option<ModelPrediction> {
        let artifact = self.artifact.as_ref()?;
        let tokens = tokenize(text, self.max_tokens);
        if tokens.is_empty() {
            // Nothing to condition on; unavailable for this call only.
            return None;
        }

        let total_docs = (artifact.class_counts[0] + artifact.class_counts[1]) as f64;
        let mut log_scores = [0.0f64; 2];
        for (class, log_score) in log_scores.iter_mut().enumerate() {
            // Laplace-smoothed class prior
            *log_score = ((artifact.class_counts[class] as f64 + 1.0) / (total_docs + 2.0)).ln();
        }

        for token in &tokens {
            let counts = artifact
                .vocabulary
                .get(token.as_str())
                .copied()
                .unwrap_or([0, 0]);
            for (class, log_score) in log_scores.iter_mut().enumerate() {
                // Laplace smoothing keeps unseen tokens from zeroing a class
                let p = (counts[class] as f64 + 1.0)
                    / (artifact.class_counts[class] as f64 + 2.0);
                *log_score += p.ln();
            }
        }

        let probabilities = softmax(log_scores);
        let is_positive = probabilities[1] > 0.5;
        let class = usize::from(is_positive);

        Some(ModelPrediction {
            is_positive,
            label: artifact.classes[class].clone(),
            confidence: probabilities[class],
            probabilities: probabilities.to_vec(),
        })
    }
}

impl TextModel for BayesTextModel {
    fn ready(&self) -> bool {
        self.status.ready
    }

    fn predict(&self, text: &str) -> Option<ModelPrediction> {
        if !self.ready() {
            return None;
        }
        self.score(text)
    }

    fn status(&self) -> ModelStatus {
        self.status.clone()
    }
}

fn tokenize(text: &str, max_tokens: usize) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 3 && w.len() <= 20)
        .take(max_tokens)
        .map(|w| w.to_string())
        .collect()
}

fn softmax(log_scores: [f64; 2]) -> [f64; 2] {
    let max = log_scores[0].max(log_scores[1]);
    let exp0 = (log_scores[0] - max).exp();
    let exp1 = (log_scores[1] - max).exp();
    let sum = exp0 + exp1;
    [exp0 / sum, exp1 / sum]
}
