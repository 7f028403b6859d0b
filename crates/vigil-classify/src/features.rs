//! Canonical feature records and tolerant input extraction
//!
//! Extraction never fails. Network input degrades through three branches:
//! positional fields, structured JSON, canonical defaults. Text input is only
//! bounded, never transformed here.

use serde::{Deserialize, Serialize};
use vigil_common::{VigilError, VigilResult};

/// Maximum accepted text sample size in bytes
pub const MAX_SAMPLE_BYTES: usize = 32 * 1024;

/// Minimum comma-separated field count for the positional branch
const POSITIONAL_MIN_FIELDS: usize = 10;

/// A bounded free-text sample
///
/// Construction enforces the byte bound; oversized input is rejected, never
/// truncated.
#[derive(Debug, Clone)]
pub struct TextSample {
    text: String,
}

impl TextSample {
    /// Accept a text sample, rejecting anything over [`MAX_SAMPLE_BYTES`]
    pub fn new(text: impl Into<String>) -> VigilResult<Self> {
        let text = text.into();
        if text.len() > MAX_SAMPLE_BYTES {
            return Err(VigilError::InputTooLarge {
                size: text.len(),
                limit: MAX_SAMPLE_BYTES,
            });
        }
        Ok(Self { text })
    }

    /// The raw sample text
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Connection feature record, NSL-KDD field set
///
/// Always fully populated: every field has a canonical default (numeric zero,
/// protocol "tcp", service "http", flag "SF"), so partial input still scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRecord {
    pub duration: f64,
    pub protocol_type: String,
    pub service: String,
    pub flag: String,
    pub src_bytes: u64,
    pub dst_bytes: u64,
    pub land: u8,
    pub wrong_fragment: u32,
    pub urgent: u32,
    pub hot: u32,
    pub num_failed_logins: u32,
    pub logged_in: u8,
    pub num_compromised: u32,
    pub root_shell: u8,
    pub su_attempted: u8,
    pub num_root: u32,
    pub num_file_creations: u32,
    pub num_shells: u32,
    pub num_access_files: u32,
    pub num_outbound_cmds: u32,
    pub is_host_login: u8,
    pub is_guest_login: u8,
    pub count: u32,
    pub srv_count: u32,
    pub serror_rate: f64,
    pub srv_serror_rate: f64,
    pub rerror_rate: f64,
    pub srv_rerror_rate: f64,
    pub same_srv_rate: f64,
    pub diff_srv_rate: f64,
    pub srv_diff_host_rate: f64,
    pub dst_host_count: u32,
    pub dst_host_srv_count: u32,
    pub dst_host_same_srv_rate: f64,
    pub dst_host_diff_srv_rate: f64,
    pub dst_host_same_src_port_rate: f64,
    pub dst_host_srv_diff_host_rate: f64,
    pub dst_host_serror_rate: f64,
    pub dst_host_srv_serror_rate: f64,
    pub dst_host_rerror_rate: f64,
    pub dst_host_srv_rerror_rate: f64,
}

impl Default for FeatureRecord {
    fn default() -> Self {
        Self {
            duration: 0.0,
            protocol_type: "tcp".to_string(),
            service: "http".to_string(),
            flag: "SF".to_string(),
            src_bytes: 0,
            dst_bytes: 0,
            land: 0,
            wrong_fragment: 0,
            urgent: 0,
            hot: 0,
            num_failed_logins: 0,
            logged_in: 0,
            num_compromised: 0,
            root_shell: 0,
            su_attempted: 0,
            num_root: 0,
            num_file_creations: 0,
            num_shells: 0,
            num_access_files: 0,
            num_outbound_cmds: 0,
            is_host_login: 0,
            is_guest_login: 0,
            count: 0,
            srv_count: 0,
            serror_rate: 0.0,
            srv_serror_rate: 0.0,
            rerror_rate: 0.0,
            srv_rerror_rate: 0.0,
            same_srv_rate: 0.0,
            diff_srv_rate: 0.0,
            srv_diff_host_rate: 0.0,
            dst_host_count: 0,
            dst_host_srv_count: 0,
            dst_host_same_srv_rate: 0.0,
            dst_host_diff_srv_rate: 0.0,
            dst_host_same_src_port_rate: 0.0,
            dst_host_srv_diff_host_rate: 0.0,
            dst_host_serror_rate: 0.0,
            dst_host_srv_serror_rate: 0.0,
            dst_host_rerror_rate: 0.0,
            dst_host_srv_rerror_rate: 0.0,
        }
    }
}

/// Which extraction branch produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordOrigin {
    /// Comma-delimited positional fields
    Positional,
    /// Structured key/value object
    Structured,
    /// Neither branch applied; canonical defaults
    Defaulted,
}

/// A feature record plus the branch that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRecord {
    pub record: FeatureRecord,
    pub origin: RecordOrigin,
}

impl ExtractedRecord {
    /// True when extraction fell back to the all-default record
    pub fn is_defaulted(&self) -> bool {
        self.origin == RecordOrigin::Defaulted
    }
}

/// Extract a feature record from raw network input
///
/// Degrades instead of failing: positional rows with missing or garbled
/// numeric fields take zeroes, structured objects fill absent keys with
/// canonical defaults, and anything else becomes the all-default record.
pub fn extract_network(raw: &str) -> ExtractedRecord {
    let trimmed = raw.trim();

    // A JSON document full of commas is not a positional row.
    let looks_structured = trimmed.starts_with('{') || trimmed.starts_with('[');
    if !looks_structured {
        let fields: Vec<&str> = trimmed.split(',').collect();
        if fields.len() >= POSITIONAL_MIN_FIELDS {
            return ExtractedRecord {
                record: positional_record(&fields),
                origin: RecordOrigin::Positional,
            };
        }
    }

    match serde_json::from_str::<FeatureRecord>(trimmed) {
        Ok(record) => ExtractedRecord {
            record,
            origin: RecordOrigin::Structured,
        },
        Err(_) => {
            tracing::debug!(len = raw.len(), "network input unparseable, scoring canonical defaults");
            ExtractedRecord {
                record: FeatureRecord::default(),
                origin: RecordOrigin::Defaulted,
            }
        }
    }
}

fn positional_record(fields: &[&str]) -> FeatureRecord {
    FeatureRecord {
        duration: float_at(fields, 0),
        protocol_type: text_at(fields, 1, "tcp"),
        service: text_at(fields, 2, "http"),
        flag: text_at(fields, 3, "SF"),
        src_bytes: float_at(fields, 4) as u64,
        dst_bytes: float_at(fields, 5) as u64,
        land: float_at(fields, 6) as u8,
        wrong_fragment: float_at(fields, 7) as u32,
        urgent: float_at(fields, 8) as u32,
        hot: float_at(fields, 9) as u32,
        num_failed_logins: float_at(fields, 10) as u32,
        logged_in: float_at(fields, 11) as u8,
        num_compromised: float_at(fields, 12) as u32,
        root_shell: float_at(fields, 13) as u8,
        su_attempted: float_at(fields, 14) as u8,
        num_root: float_at(fields, 15) as u32,
        num_file_creations: float_at(fields, 16) as u32,
        num_shells: float_at(fields, 17) as u32,
        num_access_files: float_at(fields, 18) as u32,
        num_outbound_cmds: float_at(fields, 19) as u32,
        is_host_login: float_at(fields, 20) as u8,
        is_guest_login: float_at(fields, 21) as u8,
        count: float_at(fields, 22) as u32,
        srv_count: float_at(fields, 23) as u32,
        serror_rate: float_at(fields, 24),
        srv_serror_rate: float_at(fields, 25),
        rerror_rate: float_at(fields, 26),
        srv_rerror_rate: float_at(fields, 27),
        same_srv_rate: float_at(fields, 28),
        diff_srv_rate: float_at(fields, 29),
        srv_diff_host_rate: float_at(fields, 30),
        dst_host_count: float_at(fields, 31) as u32,
        dst_host_srv_count: float_at(fields, 32) as u32,
        dst_host_same_srv_rate: float_at(fields, 33),
        dst_host_diff_srv_rate: float_at(fields, 34),
        dst_host_same_src_port_rate: float_at(fields, 35),
        dst_host_srv_diff_host_rate: float_at(fields, 36),
        dst_host_serror_rate: float_at(fields, 37),
        dst_host_srv_serror_rate: float_at(fields, 38),
        dst_host_rerror_rate: float_at(fields, 39),
        dst_host_srv_rerror_rate: float_at(fields, 40),
    }
}

// Tolerant numeric parse: absent or garbled fields read as zero. Casts from a
// negative or oversized float saturate, which keeps hostile rows in range.
fn float_at(fields: &[&str], idx: usize) -> f64 {
    fields
        .get(idx)
        .and_then(|f| f.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn text_at(fields: &[&str], idx: usize, default: &str) -> String {
    fields
        .get(idx)
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .unwrap_or(default)
        .to_string()
}
