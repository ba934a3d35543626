//! Patient sentiment and communicative intent.

use crate::defaults;
use crate::error::{NotetakerError, Result};
use crate::inference::classifier::{ZeroShotClassifier, round_score};
use crate::pipeline::types::StageStatus;
use crate::text;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// Top-1 label of one classification with its rounded score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelResult {
    pub label: String,
    pub confidence: f64,
}

impl LabelResult {
    fn placeholder(label: &str) -> Self {
        Self {
            label: label.to_string(),
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentIntentReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub sentiment: LabelResult,
    pub intent: LabelResult,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl SentimentIntentReport {
    pub fn empty_input() -> Self {
        Self {
            error: None,
            sentiment: LabelResult::placeholder("N/A"),
            intent: LabelResult::placeholder("N/A"),
            status: StageStatus::EmptyInput,
            model: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(format!("Sentiment/Intent analysis failed: {}", message.into())),
            sentiment: LabelResult::placeholder("Error"),
            intent: LabelResult::placeholder("Error"),
            status: StageStatus::Error,
            model: None,
        }
    }
}

/// Two independent zero-shot calls over the fixed taxonomies.
pub struct SentimentIntentAnalyzer {
    classifier: Arc<dyn ZeroShotClassifier>,
}

impl SentimentIntentAnalyzer {
    pub fn new(classifier: Arc<dyn ZeroShotClassifier>) -> Self {
        Self { classifier }
    }

    pub fn analyze(&self, text: &str) -> SentimentIntentReport {
        if text::is_blank(text) {
            return SentimentIntentReport::empty_input();
        }

        match self.classify_both(text) {
            Ok((sentiment, intent)) => SentimentIntentReport {
                error: None,
                sentiment,
                intent,
                status: StageStatus::Success,
                model: Some(self.classifier.model_name().to_string()),
            },
            Err(e) => {
                error!(error = %e, "Sentiment/Intent analysis failed");
                SentimentIntentReport::failed(e.to_string())
            }
        }
    }

    fn classify_both(&self, text: &str) -> Result<(LabelResult, LabelResult)> {
        let sentiment = self.top_label(text, defaults::SENTIMENT_LABELS)?;
        let intent = self.top_label(text, defaults::INTENT_LABELS)?;
        Ok((sentiment, intent))
    }

    fn top_label(&self, text: &str, labels: &[&str]) -> Result<LabelResult> {
        let classification = self.classifier.classify(text, labels, false)?;
        let top = classification
            .top()
            .ok_or_else(|| NotetakerError::MalformedResponse {
                backend: self.classifier.model_name().to_string(),
                message: "no labels in classification".to_string(),
            })?;
        Ok(LabelResult {
            label: top.label.clone(),
            confidence: round_score(top.score),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::classifier::MockClassifier;

    fn analyzer(classifier: MockClassifier) -> SentimentIntentAnalyzer {
        SentimentIntentAnalyzer::new(Arc::new(classifier))
    }

    #[test]
    fn picks_top_label_of_each_taxonomy() {
        let classifier = MockClassifier::new("mock-mnli")
            .with_score("Anxious", 0.812345)
            .with_score("Neutral", 0.1)
            .with_score("Seeking Reassurance", 0.66)
            .with_score("Reporting Symptoms", 0.2);

        let report = analyzer(classifier).analyze("I'm worried it might get worse.");

        assert_eq!(report.status, StageStatus::Success);
        assert_eq!(
            report.sentiment,
            LabelResult {
                label: "Anxious".to_string(),
                confidence: 0.8123,
            }
        );
        assert_eq!(report.intent.label, "Seeking Reassurance");
        assert_eq!(report.intent.confidence, 0.66);
        assert_eq!(report.model.as_deref(), Some("mock-mnli"));
        assert!(report.error.is_none());
    }

    #[test]
    fn blank_input_is_na() {
        let report = analyzer(MockClassifier::new("m")).analyze("   ");
        assert_eq!(report.status, StageStatus::EmptyInput);
        assert_eq!(report.sentiment, LabelResult::placeholder("N/A"));
        assert_eq!(report.intent, LabelResult::placeholder("N/A"));
        assert!(report.model.is_none());
    }

    #[test]
    fn classifier_failure_is_error_payload() {
        let report = analyzer(MockClassifier::new("m").with_failure()).analyze("hello");
        assert_eq!(report.status, StageStatus::Error);
        assert_eq!(report.sentiment.label, "Error");
        assert_eq!(report.intent.label, "Error");
        assert_eq!(report.sentiment.confidence, 0.0);
        assert_eq!(
            report.error.as_deref(),
            Some("Sentiment/Intent analysis failed: m inference failed: mock classification failure")
        );
    }

    #[test]
    fn success_serializes_model_but_not_error() {
        let report = analyzer(MockClassifier::new("mock-mnli").with_default_score(0.5)).analyze("ok");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["model"], "mock-mnli");
        assert_eq!(json["status"], "success");
        assert!(json.get("error").is_none());
        // Ties keep taxonomy order.
        assert_eq!(json["sentiment"]["label"], "Anxious");
        assert_eq!(json["intent"]["label"], "Reporting Symptoms");
    }
}
