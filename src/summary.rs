//! Clinical summary stage.
//!
//! Delegates to the abstractive summarizer and wraps its text with clinical
//! fields. Those start as placeholders; the pipeline overwrites the entity
//! lists once extraction has succeeded.

use crate::defaults;
use crate::extraction::entity::{EntityCategory, EntityCollection};
use crate::inference::summarizer::{AbstractiveSummarizer, SummaryParams};
use crate::pipeline::types::StageStatus;
use crate::text;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Provenance of a summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SummaryMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Characters of normalized transcript sent to the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_length: Option<usize>,
    /// Characters of generated summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

/// Output of the summarization stage.
///
/// Clinical fields are absent on blank input and on failure, except the
/// entity lists, which enrichment may still fill in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    pub summary_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prognosis: Option<Vec<String>>,
    pub status: StageStatus,
    pub metadata: SummaryMetadata,
}

impl SummaryResult {
    pub fn empty_input() -> Self {
        Self {
            patient_name: None,
            summary_text: "Empty transcript provided.".to_string(),
            symptoms: None,
            diagnosis: None,
            treatment: None,
            current_status: None,
            prognosis: None,
            status: StageStatus::EmptyInput,
            metadata: SummaryMetadata::default(),
        }
    }

    /// Error payload; `message` is also kept as metadata detail.
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            summary_text: format!("Summarization failed: {message}"),
            status: StageStatus::Error,
            metadata: SummaryMetadata {
                error_detail: Some(message),
                ..SummaryMetadata::default()
            },
            ..Self::empty_input()
        }
    }

    fn generated(summary_text: String, model: &str, input_length: usize) -> Self {
        let output_length = summary_text.chars().count();
        Self {
            patient_name: Some(defaults::PLACEHOLDER_PATIENT_NAME.to_string()),
            summary_text,
            symptoms: Some(Vec::new()),
            diagnosis: Some(Vec::new()),
            treatment: Some(Vec::new()),
            current_status: Some(defaults::PLACEHOLDER_CURRENT_STATUS.to_string()),
            prognosis: Some(vec![defaults::PLACEHOLDER_PROGNOSIS.to_string()]),
            status: StageStatus::Success,
            metadata: SummaryMetadata {
                model: Some(model.to_string()),
                input_length: Some(input_length),
                output_length: Some(output_length),
                error_detail: None,
            },
        }
    }

    /// Replace the entity lists with values from `entities`.
    pub fn enrich(&mut self, entities: &EntityCollection) {
        self.symptoms = Some(entities.values(EntityCategory::Symptom));
        self.diagnosis = Some(entities.values(EntityCategory::Diagnosis));
        self.treatment = Some(entities.values(EntityCategory::Treatment));
        self.prognosis = Some(entities.values(EntityCategory::Prognosis));
    }
}

/// Summarization stage over a shared summarizer backend.
pub struct Summarizer {
    backend: Arc<dyn AbstractiveSummarizer>,
    params: SummaryParams,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn AbstractiveSummarizer>) -> Self {
        Self::with_params(backend, SummaryParams::default())
    }

    pub fn with_params(backend: Arc<dyn AbstractiveSummarizer>, params: SummaryParams) -> Self {
        Self { backend, params }
    }

    pub fn summarize(&self, transcript: &str) -> SummaryResult {
        if text::is_blank(transcript) {
            return SummaryResult::empty_input();
        }

        let cleaned = text::normalize(transcript);
        let input_length = cleaned.chars().count();

        match self.backend.summarize(&cleaned, &self.params) {
            Ok(summary_text) => {
                debug!(
                    model = self.backend.model_name(),
                    input_length,
                    output_length = summary_text.chars().count(),
                    "Summary generated"
                );
                SummaryResult::generated(summary_text, self.backend.model_name(), input_length)
            }
            Err(e) => {
                error!(error = %e, "Summarization failed");
                SummaryResult::failed(e.to_string())
            }
        }
    }

    pub fn params(&self) -> &SummaryParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::entity::{EntitySource, ExtractedEntity};
    use crate::inference::summarizer::MockSummarizer;

    fn summarizer(response: &str) -> Summarizer {
        Summarizer::new(Arc::new(MockSummarizer::new("mock-bart").with_response(response)))
    }

    #[test]
    fn success_carries_placeholders_and_metadata() {
        let result = summarizer("Patient has a cough.").summarize("Doctor:  hi\nPatient: cough");

        assert_eq!(result.status, StageStatus::Success);
        assert_eq!(result.summary_text, "Patient has a cough.");
        assert_eq!(result.patient_name.as_deref(), Some("Unknown"));
        assert_eq!(result.current_status.as_deref(), Some("Stable"));
        assert_eq!(result.prognosis, Some(vec!["Good".to_string()]));
        assert_eq!(result.symptoms, Some(Vec::new()));

        assert_eq!(result.metadata.model.as_deref(), Some("mock-bart"));
        // "Doctor: hi Patient: cough" after normalization
        assert_eq!(result.metadata.input_length, Some(25));
        assert_eq!(result.metadata.output_length, Some(20));
        assert!(result.metadata.error_detail.is_none());
    }

    #[test]
    fn blank_input_is_empty_input_status() {
        let result = summarizer("unused").summarize(" \t\n");
        assert_eq!(result.status, StageStatus::EmptyInput);
        assert_eq!(result.summary_text, "Empty transcript provided.");
        assert_eq!(result.metadata, SummaryMetadata::default());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["metadata"], serde_json::json!({}));
        assert!(json.get("patient_name").is_none());
    }

    #[test]
    fn backend_failure_is_error_payload() {
        let result = Summarizer::new(Arc::new(MockSummarizer::new("mock-bart").with_failure()))
            .summarize("some transcript");

        assert_eq!(result.status, StageStatus::Error);
        assert_eq!(
            result.summary_text,
            "Summarization failed: mock-bart inference failed: mock summarization failure"
        );
        assert_eq!(
            result.metadata.error_detail.as_deref(),
            Some("mock-bart inference failed: mock summarization failure")
        );
        assert!(result.patient_name.is_none());
    }

    #[test]
    fn enrich_overwrites_entity_lists() {
        let mut result = summarizer("s").summarize("fever and stable");
        let mut entities = EntityCollection::new();
        for (value, category) in [
            ("fever", EntityCategory::Symptom),
            ("stable", EntityCategory::Prognosis),
        ] {
            entities.push_unique(ExtractedEntity {
                value: value.to_string(),
                category,
                confidence: 0.98,
                source: EntitySource::PrecisionMatch,
            });
        }

        result.enrich(&entities);

        assert_eq!(result.symptoms, Some(vec!["fever".to_string()]));
        assert_eq!(result.diagnosis, Some(Vec::new()));
        assert_eq!(result.prognosis, Some(vec!["stable".to_string()]));
        assert_eq!(result.patient_name.as_deref(), Some("Unknown"));
    }

    #[test]
    fn serialized_field_names() {
        let json = serde_json::to_value(summarizer("x").summarize("y")).unwrap();
        for key in [
            "patient_name",
            "summary_text",
            "symptoms",
            "diagnosis",
            "treatment",
            "current_status",
            "prognosis",
            "status",
            "metadata",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["status"], "success");
    }
}
