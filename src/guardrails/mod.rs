//! Input and output safety guardrails.
//!
//! Generation is wrapped by two mandatory gates: [`GuardrailPolicy::screen_input`]
//! runs before any retrieval or model call, and [`GuardrailPolicy::screen_output`]
//! runs on the raw model answer before it reaches the caller. Both are pure
//! functions of their input and the configured tables, so the policy can be
//! audited and tested independently of any particular model.
//!
//! The input gate is table-driven: phrase tables come from configuration
//! (`[guardrails]` in `sage.toml`), not hard-coded branches. Checks run in a
//! fixed order - injection phrases, then restricted topics, then query length -
//! and the first match wins.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Matches a bare 10-digit run at word boundaries, a proxy for leaked
/// phone numbers and similar PII.
fn pii_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\d{10}\b").expect("PII pattern is a valid regex"))
}

/// Why an input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectionKind {
    /// The query matched a prompt-injection phrase.
    Injection,
    /// The query touched a restricted topic.
    RestrictedTopic,
    /// The query exceeded the maximum length.
    TooLong,
}

/// Outcome of the input gate.
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyVerdict {
    /// Whether the query may proceed to retrieval and generation.
    pub allowed: bool,
    /// Set when `allowed` is false.
    pub rejection: Option<Rejection>,
}

/// A rejection with its category and user-facing reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Which check fired.
    pub kind: RejectionKind,
    /// Human-readable reason, suitable for display.
    pub reason: String,
}

impl SafetyVerdict {
    fn allow() -> Self {
        Self {
            allowed: true,
            rejection: None,
        }
    }

    fn reject(kind: RejectionKind, reason: &str) -> Self {
        Self {
            allowed: false,
            rejection: Some(Rejection {
                kind,
                reason: reason.to_string(),
            }),
        }
    }
}

// ============= Policy Configuration =============

/// Table-driven safety policy for queries and answers.
///
/// Deserializes from the `[guardrails]` section of `sage.toml`; every field
/// falls back to the production defaults when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailPolicy {
    /// Phrases that indicate a prompt-injection or jailbreak attempt.
    /// Matched case-insensitively as substrings; checked first.
    #[serde(default = "default_injection_phrases")]
    pub injection_phrases: Vec<String>,

    /// Topics the assistant must not discuss. Matched case-insensitively
    /// as substrings; checked after injection phrases.
    #[serde(default = "default_restricted_topics")]
    pub restricted_topics: Vec<String>,

    /// Maximum query length in characters, exclusive. Checked last.
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Fixed notice that replaces an answer containing leaked PII.
    #[serde(default = "default_redaction_notice")]
    pub redaction_notice: String,
}

fn default_injection_phrases() -> Vec<String> {
    [
        "ignore all previous instructions",
        "forget everything you know",
        "system prompt",
        "developer mode",
        "you are now a",
        "act as a",
        "bypass",
        "jailbreak",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_restricted_topics() -> Vec<String> {
    [
        "hack",
        "virus",
        "bomb",
        "kill",
        "drug",
        "illegal",
        "password",
        "credit card",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_query_length() -> usize {
    500
}

fn default_redaction_notice() -> String {
    "Response blocked: contains sensitive contact information.".to_string()
}

impl Default for GuardrailPolicy {
    fn default() -> Self {
        Self {
            injection_phrases: default_injection_phrases(),
            restricted_topics: default_restricted_topics(),
            max_query_length: default_max_query_length(),
            redaction_notice: default_redaction_notice(),
        }
    }
}

/// Reason shown when an injection phrase matches.
pub const INJECTION_REASON: &str = "Security alert: prompt injection attempt detected.";
/// Reason shown when a restricted topic matches.
pub const RESTRICTED_TOPIC_REASON: &str =
    "I'm sorry, I can only discuss school-related academic topics.";
/// Reason shown when the query exceeds the maximum length.
pub const TOO_LONG_REASON: &str = "Message is too long. Please keep questions concise.";

impl GuardrailPolicy {
    /// Screen a user query before it reaches retrieval or generation.
    ///
    /// Checks run in order - injection phrases, restricted topics, length -
    /// and the first match short-circuits.
    pub fn screen_input(&self, query: &str) -> SafetyVerdict {
        let lowered = query.to_lowercase();

        for phrase in &self.injection_phrases {
            if lowered.contains(&phrase.to_lowercase()) {
                return SafetyVerdict::reject(RejectionKind::Injection, INJECTION_REASON);
            }
        }

        for topic in &self.restricted_topics {
            if lowered.contains(&topic.to_lowercase()) {
                return SafetyVerdict::reject(RejectionKind::RestrictedTopic, RESTRICTED_TOPIC_REASON);
            }
        }

        if query.chars().count() > self.max_query_length {
            return SafetyVerdict::reject(RejectionKind::TooLong, TOO_LONG_REASON);
        }

        SafetyVerdict::allow()
    }

    /// Screen a model answer before it reaches the caller.
    ///
    /// If the answer contains a bare 10-digit run, the whole answer is
    /// replaced with the configured redaction notice; the matched substring
    /// is never masked in place. Otherwise the answer passes through
    /// unchanged. Idempotent.
    pub fn screen_output(&self, answer: &str) -> String {
        if pii_pattern().is_match(answer) {
            self.redaction_notice.clone()
        } else {
            answer.to_string()
        }
    }
}
