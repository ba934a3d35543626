//! Zero-shot classification: the backend trait, ranked results and a mock.
//!
//! Keyword detection and sentiment/intent analysis both sit on this trait.

use crate::defaults;
use crate::error::{NotetakerError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// One candidate label with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Classifier output: labels ranked by descending score.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classification {
    ranked: Vec<LabelScore>,
}

impl Classification {
    /// Build from parallel label/score vectors, as most zero-shot services return them.
    ///
    /// Ranking is re-established here (stable sort) so callers can rely on it
    /// whatever order the backend used.
    pub fn from_parallel(labels: Vec<String>, scores: Vec<f64>) -> Result<Self> {
        if labels.len() != scores.len() {
            return Err(NotetakerError::MalformedResponse {
                backend: "classifier".to_string(),
                message: format!("{} labels but {} scores", labels.len(), scores.len()),
            });
        }
        Ok(Self::from_scores(
            labels
                .into_iter()
                .zip(scores)
                .map(|(label, score)| LabelScore { label, score })
                .collect(),
        ))
    }

    pub fn from_scores(mut ranked: Vec<LabelScore>) -> Self {
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self { ranked }
    }

    /// Highest-scoring label.
    pub fn top(&self) -> Option<&LabelScore> {
        self.ranked.first()
    }

    pub fn ranked(&self) -> &[LabelScore] {
        &self.ranked
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Round a classifier score to the fixed number of reported decimals.
pub fn round_score(score: f64) -> f64 {
    let factor = 10f64.powi(defaults::SCORE_DECIMALS);
    (score * factor).round() / factor
}

/// Trait for zero-shot text classification.
///
/// This trait allows swapping implementations (hosted model vs mock).
/// Calls are blocking; the pipeline runs them on the blocking pool.
pub trait ZeroShotClassifier: Send + Sync {
    /// Score `text` against each candidate label.
    ///
    /// With `multi_label` every label is scored independently; otherwise the
    /// scores are normalized across the candidate set.
    fn classify(&self, text: &str, labels: &[&str], multi_label: bool) -> Result<Classification>;

    /// Get the name of the backing model
    fn model_name(&self) -> &str;
}

/// Implement ZeroShotClassifier for Arc<T> to allow sharing across requests.
impl<T: ZeroShotClassifier + ?Sized> ZeroShotClassifier for Arc<T> {
    fn classify(&self, text: &str, labels: &[&str], multi_label: bool) -> Result<Classification> {
        (**self).classify(text, labels, multi_label)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Mock classifier for testing and offline wiring
#[derive(Debug, Clone)]
pub struct MockClassifier {
    model_name: String,
    scores: HashMap<String, f64>,
    default_score: f64,
    should_fail: bool,
    delay: Option<Duration>,
}

impl MockClassifier {
    /// Create a mock that scores every label with 0.0
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            scores: HashMap::new(),
            default_score: 0.0,
            should_fail: false,
            delay: None,
        }
    }

    /// Configure the score returned for one label
    pub fn with_score(mut self, label: &str, score: f64) -> Self {
        self.scores.insert(label.to_string(), score);
        self
    }

    /// Configure the score returned for labels without an explicit score
    pub fn with_default_score(mut self, score: f64) -> Self {
        self.default_score = score;
        self
    }

    /// Configure the mock to fail on classify
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to block for `delay` on every classify call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl ZeroShotClassifier for MockClassifier {
    fn classify(&self, _text: &str, labels: &[&str], _multi_label: bool) -> Result<Classification> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.should_fail {
            return Err(NotetakerError::Inference {
                backend: self.model_name.clone(),
                message: "mock classification failure".to_string(),
            });
        }

        Ok(Classification::from_scores(
            labels
                .iter()
                .map(|label| LabelScore {
                    label: label.to_string(),
                    score: self
                        .scores
                        .get(*label)
                        .copied()
                        .unwrap_or(self.default_score),
                })
                .collect(),
        ))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
