//! Trained-model adapter for Vigil text classification
//!
//! The heuristic scorers in `vigil-classify` work without any model. This crate
//! adds the optional trained side of the text path: a [`TextModel`] trait the
//! ensemble consumes, plus a bundled naive-Bayes classifier whose vocabulary is
//! loaded once from a JSON artifact at startup.
//!
//! Readiness is a value, not an error: a missing or unreadable artifact leaves
//! the adapter permanently not ready for the process lifetime, and every caller
//! can see why through [`ModelStatus`]. A runtime failure inside one prediction
//! is converted to `None` for that call only.

#![warn(missing_docs)]

pub mod bayes;

pub use bayes::{BayesTextModel, ModelArtifact};

use serde::{Deserialize, Serialize};

/// Model adapter configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Path to the vocabulary artifact (JSON); `None` means no model
    pub artifact_path: Option<std::path::PathBuf>,
    /// Maximum number of tokens fed into one prediction
    pub max_tokens: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: None,
            max_tokens: 512,
        }
    }
}

/// Readiness report for the model adapter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelStatus {
    /// Whether predictions are being served
    pub ready: bool,
    /// Why the adapter is or is not ready
    pub detail: String,
}

impl ModelStatus {
    /// Status for a serving adapter
    pub fn ready(detail: impl Into<String>) -> Self {
        Self {
            ready: true,
            detail: detail.into(),
        }
    }

    /// Status for an adapter that will not serve for this process lifetime
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self {
            ready: false,
            detail: detail.into(),
        }
    }
}

/// One prediction from a trained model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPrediction {
    /// Whether the positive class won
    pub is_positive: bool,
    /// Label of the winning class
    pub label: String,
    /// Probability of the winning class
    pub confidence: f64,
    /// Full class-probability distribution, artifact class order
    pub probabilities: Vec<f64>,
}

/// A trained probabilistic text classifier
///
/// `predict` returning `None` means "unavailable for this call": either the
/// adapter never became ready, or this particular inference failed. Neither
/// case is an error the caller must handle beyond falling back to heuristics.
pub trait TextModel: Send + Sync {
    /// Whether the adapter loaded its artifacts at startup
    fn ready(&self) -> bool;

    /// Classify one normalized text sample
    fn predict(&self, text: &str) -> Option<ModelPrediction>;

    /// Readiness plus a human-readable reason
    fn status(&self) -> ModelStatus;
}
