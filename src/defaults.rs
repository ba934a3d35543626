//! Default configuration constants for notetaker.
//!
//! Shared by the config layer and the pipeline components so that the
//! documented defaults live in exactly one place.

/// Confidence assigned to every entity found by the precision (phrase matcher) tier.
///
/// A per-tier constant, not a measured matcher certainty.
pub const PRECISION_CONFIDENCE: f64 = 0.98;

/// Confidence assigned to every entity found by the lexical fallback tier.
pub const FALLBACK_CONFIDENCE: f64 = 0.90;

/// Keyword tags at or below this classifier score are dropped.
pub const KEYWORD_THRESHOLD: f64 = 0.30;

/// Candidate labels for keyword tagging (multi-label).
pub const KEYWORD_LABELS: &[&str] = &["symptoms", "medication", "follow-up", "diagnosis", "vitals"];

/// Patient sentiment taxonomy.
pub const SENTIMENT_LABELS: &[&str] = &["Anxious", "Neutral", "Reassured", "Frustrated", "Hopeful"];

/// Patient communicative-intent taxonomy.
pub const INTENT_LABELS: &[&str] = &[
    "Reporting Symptoms",
    "Seeking Reassurance",
    "Expressing Relief",
    "Requesting Medication",
    "Inquiring about Prognosis",
];

/// Number of decimal places kept on classifier scores.
pub const SCORE_DECIMALS: i32 = 4;

/// Upper bound on generated summary length (tokens).
pub const SUMMARY_MAX_LENGTH: u32 = 150;

/// Lower bound on generated summary length (tokens).
pub const SUMMARY_MIN_LENGTH: u32 = 40;

/// Default zero-shot classification model.
pub const DEFAULT_CLASSIFIER_MODEL: &str = "facebook/bart-large-mnli";

/// Default abstractive summarization model.
pub const DEFAULT_SUMMARIZER_MODEL: &str = "sshleifer/distilbart-cnn-12-6";

/// Base URL of the hosted inference API. The model id is appended as a path segment.
pub const DEFAULT_API_URL: &str = "https://api-inference.huggingface.co/models";

/// Default per-call timeout for inference backends, in seconds.
///
/// Cold model loads on hosted inference can take tens of seconds.
pub const INFERENCE_TIMEOUT_SECS: u64 = 60;

/// Upper bound accepted for any backend timeout, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default output directory for persisted audit documents.
pub const OUTPUT_DIR: &str = "outputs";

/// Default audit document filename.
pub const OUTPUT_FILENAME: &str = "audit_output.json";

/// System identifier recorded in every audit document.
pub const SYSTEM_ID: &str = "Physician Notetaker AI v1.1";

/// Execution device recorded in audit metadata.
pub const DEVICE: &str = "CPU (Offline-friendly)";

pub const AUDITABILITY_NOTE: &str =
    "Confidence scores and source attribution included for all AI-generated fields.";

pub const CONFIDENCE_AUDIT_NOTE: &str = "Rule-based NER provides high precision for clinical terms. BART-based summarization and Zero-shot classification provide high-recall insights.";

pub const EXTENSIBILITY_NOTE: &str = "The pipeline uses standardized JSON interfaces, making it compatible with FHIR/HL7 standards for future EHR integrations.";

/// Placeholder patient name until a real demographic source exists.
pub const PLACEHOLDER_PATIENT_NAME: &str = "Unknown";

/// Placeholder clinical status on a fresh summary.
pub const PLACEHOLDER_CURRENT_STATUS: &str = "Stable";

/// Placeholder prognosis on a fresh summary.
pub const PLACEHOLDER_PROGNOSIS: &str = "Good";
