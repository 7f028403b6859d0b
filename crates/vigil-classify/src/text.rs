//! Keyword/category heuristic scorer for message content
//!
//! Five keyword categories with fixed per-term weights plus four structural
//! checks. All matched contributions add up uncapped; the raw score only
//! becomes a bounded confidence at the end.

use aho_corasick::AhoCorasick;
use vigil_common::{SignalTrace, ThreatLevel, Verdict, CONFIDENCE_CEILING, CONFIDENCE_FLOOR};

use crate::features::TextSample;

/// Raw score at which a sample is called phishing
///
/// Deliberately low: the scorer trades precision for recall, so one strong
/// indicator alone classifies positive.
pub const PHISHING_THRESHOLD: u32 = 25;

/// Denominator converting raw points into confidence
const MAX_SCORE: f64 = 100.0;

/// Category a pattern rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCategory {
    /// High-confidence phishing phrasing
    Strong,
    /// Common lure phrasing
    Medium,
    /// Marketing-style filler phrasing
    Weak,
    /// Financial and credential-service terms
    Financial,
    /// Suspicious URL markers
    UrlMarker,
    /// Whole-message structural checks
    Structural,
}

impl PatternCategory {
    /// Short name used in trace ids
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternCategory::Strong => "strong",
            PatternCategory::Medium => "medium",
            PatternCategory::Weak => "weak",
            PatternCategory::Financial => "financial",
            PatternCategory::UrlMarker => "url",
            PatternCategory::Structural => "structural",
        }
    }
}

struct KeywordCategory {
    category: PatternCategory,
    weight: u32,
    terms: &'static [&'static str],
}

struct TermMeta {
    category: PatternCategory,
    weight: u32,
    term: &'static str,
}

enum StructuralCheck {
    /// "http://" present with no "https://" anywhere in the text
    InsecureLinkOnly,
    /// `term` occurs at least `min` times
    RepeatedTerm { term: &'static str, min: usize },
    /// Fixed phrase present
    Phrase(&'static str),
    /// Any of the phrases present
    AnyPhrase(&'static [&'static str]),
}

struct StructuralRule {
    id: &'static str,
    description: &'static str,
    weight: u32,
    check: StructuralCheck,
}

impl StructuralRule {
    fn matches(&self, text: &str) -> bool {
        match &self.check {
            StructuralCheck::InsecureLinkOnly => {
                text.contains("http://") && !text.contains("https://")
            }
            StructuralCheck::RepeatedTerm { term, min } => text.matches(term).count() >= *min,
            StructuralCheck::Phrase(phrase) => text.contains(phrase),
            StructuralCheck::AnyPhrase(phrases) => phrases.iter().any(|p| text.contains(p)),
        }
    }
}

/// Keyword/category heuristic scorer for the text domain
pub struct TextScorer {
    terms: Vec<TermMeta>,
    matcher: Option<AhoCorasick>,
    structural: Vec<StructuralRule>,
}

impl TextScorer {
    /// Build the scorer with the default pattern tables
    pub fn new() -> Self {
        let terms: Vec<TermMeta> = default_keyword_categories()
            .into_iter()
            .flat_map(|cat| {
                cat.terms.iter().copied().map(move |term| TermMeta {
                    category: cat.category,
                    weight: cat.weight,
                    term,
                })
            })
            .collect();
        let matcher = AhoCorasick::new(terms.iter().map(|t| t.term)).ok();

        Self {
            terms,
            matcher,
            structural: default_structural_rules(),
        }
    }

    /// Classify one bounded text sample
    pub fn classify(&self, sample: &TextSample) -> Verdict {
        let text = sample.as_str().to_lowercase();
        let mut raw: u32 = 0;
        let mut sources = Vec::new();

        for (meta, hit) in self.terms.iter().zip(self.term_hits(&text)) {
            if hit {
                raw += meta.weight;
                sources.push(SignalTrace::new(
                    format!("{}:{}", meta.category.as_str(), meta.term),
                    format!("matched \"{}\"", meta.term),
                    f64::from(meta.weight),
                ));
            }
        }

        for rule in &self.structural {
            if rule.matches(&text) {
                raw += rule.weight;
                sources.push(SignalTrace::new(
                    rule.id,
                    rule.description,
                    f64::from(rule.weight),
                ));
            }
        }

        let confidence = (f64::from(raw) / MAX_SCORE).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING);
        let is_positive = raw >= PHISHING_THRESHOLD;
        let label = if is_positive { "phishing" } else { "legitimate" };

        Verdict::new(
            is_positive,
            label,
            confidence,
            confidence_tier(is_positive, confidence),
            sources,
        )
    }

    // Term presence per table entry. Each term counts once no matter how often
    // it occurs; overlapping terms ("click here immediately" over "click here")
    // count independently.
    fn term_hits(&self, text: &str) -> Vec<bool> {
        let mut hits = vec![false; self.terms.len()];
        match &self.matcher {
            Some(ac) => {
                for m in ac.find_overlapping_iter(text) {
                    hits[m.pattern().as_usize()] = true;
                }
            }
            None => {
                for (idx, meta) in self.terms.iter().enumerate() {
                    hits[idx] = text.contains(meta.term);
                }
            }
        }
        hits
    }
}

impl Default for TextScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Threat tier of a text verdict, derived from its confidence
pub(crate) fn confidence_tier(is_positive: bool, confidence: f64) -> ThreatLevel {
    if !is_positive {
        ThreatLevel::Low
    } else if confidence > 0.8 {
        ThreatLevel::High
    } else {
        ThreatLevel::Medium
    }
}

fn default_keyword_categories() -> Vec<KeywordCategory> {
    vec![
        KeywordCategory {
            category: PatternCategory::Strong,
            weight: 25,
            terms: &[
                "verify account",
                "suspend",
                "suspended",
                "immediate action",
                "urgent action",
                "click here immediately",
                "confirm identity",
                "update payment",
                "payment failed",
                "account locked",
                "security alert",
                "unusual activity",
                "verify now",
                "expires today",
                "expires soon",
                "limited time",
                "act now",
                "claim now",
                "congratulations you have won",
                "you are a winner",
                "tax refund",
            ],
        },
        KeywordCategory {
            category: PatternCategory::Medium,
            weight: 15,
            terms: &[
                "click here",
                "click link",
                "dear customer",
                "dear user",
                "dear sir/madam",
                "winner",
                "prize",
                "free money",
                "cash prize",
                "inheritance",
                "lottery",
                "jackpot",
                "million dollars",
                "urgent",
                "asap",
            ],
        },
        KeywordCategory {
            category: PatternCategory::Weak,
            weight: 10,
            terms: &[
                "congratulations",
                "free",
                "offer",
                "special deal",
                "limited offer",
                "no cost",
                "risk free",
                "guaranteed",
                "100%",
                "amazing deal",
            ],
        },
        KeywordCategory {
            category: PatternCategory::Financial,
            weight: 30,
            terms: &[
                "bank support",
                "account verification",
                "online banking",
                "credit card",
                "paypal",
                "amazon",
                "apple id",
                "microsoft account",
                "google account",
                "password reset",
                "login credentials",
                "two-factor authentication",
            ],
        },
        KeywordCategory {
            category: PatternCategory::UrlMarker,
            weight: 20,
            terms: &[
                "http://",
                "bit.ly",
                "tinyurl",
                "login.",
                "verify.",
                "secure.",
                "update.",
                "confirm.",
                ".tk",
                ".ml",
                ".ga",
            ],
        },
    ]
}

fn default_structural_rules() -> Vec<StructuralRule> {
    vec![
        StructuralRule {
            id: "insecure-link",
            description: "unencrypted http link with no https alternative",
            weight: 20,
            check: StructuralCheck::InsecureLinkOnly,
        },
        StructuralRule {
            id: "repeated-click",
            description: "multiple click prompts",
            weight: 15,
            check: StructuralCheck::RepeatedTerm {
                term: "click",
                min: 2,
            },
        },
        StructuralRule {
            id: "threat-language",
            description: "threatening consequence phrasing",
            weight: 35,
            check: StructuralCheck::Phrase("failure to do so will result in"),
        },
        StructuralRule {
            id: "generic-salutation",
            description: "impersonal salutation",
            weight: 20,
            check: StructuralCheck::AnyPhrase(&["dear sir", "dear madam"]),
        },
    ]
}
