//! Ordered attack-signature engine over connection feature records
//!
//! Every signature's predicate is evaluated independently and every match adds
//! its score. The label is a separate concern: signatures claim it by declared
//! priority, and an exclusive claim cannot be displaced by a non-exclusive
//! match no matter its priority. Suppressed matches keep their trace entry.

use vigil_common::{SignalTrace, ThreatLevel, Verdict};

use crate::features::FeatureRecord;

/// Raw score above which a record is classified as an attack
pub const ATTACK_THRESHOLD: f64 = 0.3;

/// One attack signature: an independent predicate plus label-claim metadata
pub struct AttackSignature {
    /// Stable id used in traces
    pub id: &'static str,
    /// Attack label this signature claims
    pub attack_type: &'static str,
    /// One-line description of the matched pattern
    pub summary: &'static str,
    /// Score added whenever the predicate holds
    pub score: f64,
    /// Threat level assigned if this signature wins the label
    pub threat_level: ThreatLevel,
    /// Label-claim precedence; higher displaces lower
    pub priority: u8,
    /// An exclusive claim can only be displaced by another exclusive signature
    pub exclusive: bool,
    predicate: fn(&FeatureRecord) -> bool,
}

impl AttackSignature {
    /// Whether this signature fires for the record
    pub fn matches(&self, record: &FeatureRecord) -> bool {
        (self.predicate)(record)
    }
}

impl std::fmt::Debug for AttackSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttackSignature")
            .field("id", &self.id)
            .field("attack_type", &self.attack_type)
            .field("score", &self.score)
            .field("priority", &self.priority)
            .field("exclusive", &self.exclusive)
            .finish()
    }
}

/// Signature engine for the network domain
pub struct SignatureEngine {
    signatures: Vec<AttackSignature>,
}

impl SignatureEngine {
    /// Build the engine with the default signature set
    pub fn new() -> Self {
        Self {
            signatures: default_signatures(),
        }
    }

    /// The signatures this engine evaluates, in declared order
    pub fn signatures(&self) -> &[AttackSignature] {
        &self.signatures
    }

    /// Classify one feature record
    pub fn classify(&self, record: &FeatureRecord) -> Verdict {
        let mut raw = 0.0_f64;
        let mut sources = Vec::new();
        let mut claim: Option<&AttackSignature> = None;

        for signature in &self.signatures {
            if !signature.matches(record) {
                continue;
            }
            raw += signature.score;
            sources.push(SignalTrace::new(
                signature.id,
                signature.summary,
                signature.score,
            ));

            let takes_label = match claim {
                None => true,
                Some(current) => {
                    signature.priority > current.priority
                        && !(current.exclusive && !signature.exclusive)
                }
            };
            if takes_label {
                claim = Some(signature);
            }
        }

        match claim {
            Some(signature) if raw > ATTACK_THRESHOLD => {
                tracing::debug!(
                    attack_type = signature.attack_type,
                    raw,
                    matches = sources.len(),
                    "record classified as attack"
                );
                Verdict::new(
                    true,
                    signature.attack_type,
                    raw,
                    signature.threat_level,
                    sources,
                )
            }
            // Below the threshold the label is forced to normal/low; partial
            // matches stay visible through the sources.
            _ => Verdict::new(false, "normal", raw, ThreatLevel::Low, sources),
        }
    }
}

impl Default for SignatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected_private_sweep(r: &FeatureRecord) -> bool {
    r.protocol_type == "tcp" && r.service == "private" && r.flag == "REJ" && r.count > 100
}

fn scattered_service_sweep(r: &FeatureRecord) -> bool {
    r.dst_host_srv_count > 50 && r.dst_host_same_srv_rate < 0.1
}

fn half_open_flood(r: &FeatureRecord) -> bool {
    r.protocol_type == "tcp" && r.flag == "S0" && r.count > 100
}

fn icmp_flood(r: &FeatureRecord) -> bool {
    r.protocol_type == "icmp" && r.count > 200
}

fn high_error_scan(r: &FeatureRecord) -> bool {
    r.rerror_rate > 0.5 && r.srv_rerror_rate > 0.5 && r.count > 10
}

fn oversized_http_payload(r: &FeatureRecord) -> bool {
    r.src_bytes > 5000 && r.service == "http" && r.hot > 0
}

fn echo_probe_spread(r: &FeatureRecord) -> bool {
    r.protocol_type == "icmp" && r.service == "ecr_i" && r.dst_host_count > 100
}

fn malformed_udp_fragments(r: &FeatureRecord) -> bool {
    r.protocol_type == "udp" && r.wrong_fragment > 0
}

fn ftp_file_drops(r: &FeatureRecord) -> bool {
    r.service.contains("ftp") && r.num_file_creations > 0
}

fn privileged_access(r: &FeatureRecord) -> bool {
    r.num_root > 0 || r.root_shell > 0 || r.su_attempted > 0
}

fn repeated_failed_logins(r: &FeatureRecord) -> bool {
    r.num_failed_logins > 2
}

fn default_signatures() -> Vec<AttackSignature> {
    vec![
        AttackSignature {
            id: "portsweep-strict",
            attack_type: "portsweep",
            summary: "many rejected tcp connections to private services",
            score: 0.85,
            threat_level: ThreatLevel::High,
            priority: 100,
            exclusive: true,
            predicate: rejected_private_sweep,
        },
        AttackSignature {
            id: "portsweep-wide",
            attack_type: "portsweep",
            summary: "many services touched with low same-service rate",
            score: 0.7,
            threat_level: ThreatLevel::Medium,
            priority: 62,
            exclusive: false,
            predicate: scattered_service_sweep,
        },
        AttackSignature {
            id: "neptune-syn-flood",
            attack_type: "neptune",
            summary: "syn flood: many half-open connections",
            score: 0.9,
            threat_level: ThreatLevel::Critical,
            priority: 98,
            exclusive: true,
            predicate: half_open_flood,
        },
        AttackSignature {
            id: "smurf-icmp-flood",
            attack_type: "smurf",
            summary: "icmp flood",
            score: 0.85,
            threat_level: ThreatLevel::High,
            priority: 80,
            exclusive: false,
            predicate: icmp_flood,
        },
        AttackSignature {
            id: "satan-scan",
            attack_type: "satan",
            summary: "high error rates consistent with reconnaissance",
            score: 0.75,
            threat_level: ThreatLevel::Medium,
            priority: 70,
            exclusive: false,
            predicate: high_error_scan,
        },
        AttackSignature {
            id: "buffer-overflow",
            attack_type: "buffer_overflow",
            summary: "oversized http payload with hot indicators",
            score: 0.8,
            threat_level: ThreatLevel::Critical,
            priority: 86,
            exclusive: false,
            predicate: oversized_http_payload,
        },
        AttackSignature {
            id: "ipsweep-probe",
            attack_type: "ipsweep",
            summary: "icmp echo probes across many hosts",
            score: 0.7,
            threat_level: ThreatLevel::Medium,
            priority: 64,
            exclusive: false,
            predicate: echo_probe_spread,
        },
        AttackSignature {
            id: "teardrop-fragments",
            attack_type: "teardrop",
            summary: "malformed udp fragments",
            score: 0.9,
            threat_level: ThreatLevel::Critical,
            priority: 90,
            exclusive: false,
            predicate: malformed_udp_fragments,
        },
        AttackSignature {
            id: "warezclient-ftp",
            attack_type: "warezclient",
            summary: "suspicious ftp file activity",
            score: 0.6,
            threat_level: ThreatLevel::Medium,
            priority: 56,
            exclusive: false,
            predicate: ftp_file_drops,
        },
        AttackSignature {
            id: "rootkit-escalation",
            attack_type: "rootkit",
            summary: "privileged access attempts",
            score: 0.85,
            threat_level: ThreatLevel::Critical,
            priority: 88,
            exclusive: false,
            predicate: privileged_access,
        },
        AttackSignature {
            id: "bruteforce-logins",
            attack_type: "bruteforce",
            summary: "repeated failed logins",
            score: 0.6,
            threat_level: ThreatLevel::Medium,
            priority: 50,
            exclusive: false,
            predicate: repeated_failed_logins,
        },
    ]
}
