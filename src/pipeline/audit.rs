//! The audit document: every stage output plus provenance metadata.

use crate::defaults;
use crate::extraction::extractor::EntityReport;
use crate::sentiment::SentimentIntentReport;
use crate::soap::SoapNote;
use crate::summary::SummaryResult;
use serde::Serialize;
use std::time::Duration;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time in the audit timestamp format.
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Elapsed seconds rounded to four decimals.
pub fn elapsed_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 10_000.0).round() / 10_000.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditMetadata {
    pub system: String,
    pub timestamp: String,
    pub processing_time_sec: f64,
    /// Characters in the raw transcript.
    pub transcript_length: usize,
    pub auditability: String,
    pub device: String,
}

impl AuditMetadata {
    pub fn new(timestamp: String, elapsed: Duration, transcript_length: usize) -> Self {
        Self {
            system: defaults::SYSTEM_ID.to_string(),
            timestamp,
            processing_time_sec: elapsed_secs(elapsed),
            transcript_length,
            auditability: defaults::AUDITABILITY_NOTE.to_string(),
            device: defaults::DEVICE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessionalNotes {
    pub confidence_audit: String,
    pub extensibility: String,
}

impl Default for ProfessionalNotes {
    fn default() -> Self {
        Self {
            confidence_audit: defaults::CONFIDENCE_AUDIT_NOTE.to_string(),
            extensibility: defaults::EXTENSIBILITY_NOTE.to_string(),
        }
    }
}

/// Complete record of one processed transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditDocument {
    pub metadata: AuditMetadata,
    pub clinical_summary: SummaryResult,
    pub medical_entities: EntityReport,
    pub sentiment_and_intent: SentimentIntentReport,
    pub soap_note: SoapNote,
    pub professional_notes: ProfessionalNotes,
}

/// Returned instead of a document when the request could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEnvelope {
    pub error: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl FailureEnvelope {
    pub fn empty_transcript() -> Self {
        Self {
            error: "Empty transcript provided".to_string(),
            status: "failed",
            timestamp: None,
        }
    }

    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self {
            error: format!("Internal pipeline error: {message}"),
            status: "failed",
            timestamp: Some(timestamp_now()),
        }
    }
}

/// Result of one pipeline run. Serializes as the bare document or envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AuditOutcome {
    Completed(Box<AuditDocument>),
    Failed(FailureEnvelope),
}

impl AuditOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, AuditOutcome::Completed(_))
    }

    pub fn document(&self) -> Option<&AuditDocument> {
        match self {
            AuditOutcome::Completed(doc) => Some(doc.as_ref()),
            AuditOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureEnvelope> {
        match self {
            AuditOutcome::Completed(_) => None,
            AuditOutcome::Failed(envelope) => Some(envelope),
        }
    }
}
