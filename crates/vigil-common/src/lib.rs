//! Vigil Common - shared types for the threat classification core
//!
//! This crate provides the vocabulary the rest of the workspace speaks:
//! - Verdicts and their confidence invariants
//! - Threat levels and alert severities
//! - The error taxonomy
//!
//! Everything here is plain data. Classification logic lives in
//! `vigil-classify`, alerting in `vigil-pipeline`.

#![warn(missing_docs)]

pub mod error;
pub mod verdict;

pub use error::{VigilError, VigilResult};
pub use verdict::{
    Severity, SignalDomain, SignalTrace, ThreatLevel, Verdict, CONFIDENCE_CEILING,
    CONFIDENCE_FLOOR,
};
