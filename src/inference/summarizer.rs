//! Abstractive summarization backend trait and its mock.

use crate::defaults;
use crate::error::{NotetakerError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Generation settings passed to an abstractive summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryParams {
    pub max_length: u32,
    pub min_length: u32,
    /// Sampling off means greedy/beam decoding: same input, same summary.
    pub do_sample: bool,
    /// Let the backend cut input that exceeds its context window.
    pub truncation: bool,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            max_length: defaults::SUMMARY_MAX_LENGTH,
            min_length: defaults::SUMMARY_MIN_LENGTH,
            do_sample: false,
            truncation: true,
        }
    }
}

/// Trait for abstractive summarization.
///
/// This trait allows swapping implementations (hosted model vs mock).
pub trait AbstractiveSummarizer: Send + Sync {
    /// Produce one summary string for `text`.
    fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String>;

    /// Get the name of the backing model
    fn model_name(&self) -> &str;
}

/// Implement AbstractiveSummarizer for Arc<T> to allow sharing across requests.
impl<T: AbstractiveSummarizer + ?Sized> AbstractiveSummarizer for Arc<T> {
    fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String> {
        (**self).summarize(text, params)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Mock summarizer for testing
#[derive(Debug, Clone)]
pub struct MockSummarizer {
    model_name: String,
    response: String,
    should_fail: bool,
    should_panic: bool,
    delay: Option<Duration>,
}

impl MockSummarizer {
    /// Create a new mock summarizer with default settings
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            response: "mock summary".to_string(),
            should_fail: false,
            should_panic: false,
            delay: None,
        }
    }

    /// Configure the mock to return a specific summary
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on summarize
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to panic on summarize, simulating a crashed worker
    pub fn with_panic(mut self) -> Self {
        self.should_panic = true;
        self
    }

    /// Configure the mock to block for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl AbstractiveSummarizer for MockSummarizer {
    fn summarize(&self, _text: &str, _params: &SummaryParams) -> Result<String> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.should_panic {
            panic!("mock summarizer panicked");
        }
        if self.should_fail {
            Err(NotetakerError::Inference {
                backend: self.model_name.clone(),
                message: "mock summarization failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_deterministic_with_fixed_bounds() {
        let params = SummaryParams::default();
        assert_eq!(params.max_length, 150);
        assert_eq!(params.min_length, 40);
        assert!(!params.do_sample);
        assert!(params.truncation);
    }

    #[test]
    fn mock_returns_configured_response() {
        let summarizer = MockSummarizer::new("mock-bart").with_response("Patient has a cold.");
        let summary = summarizer
            .summarize("long transcript", &SummaryParams::default())
            .unwrap();
        assert_eq!(summary, "Patient has a cold.");
    }

    #[test]
    fn mock_failure_returns_inference_error() {
        let summarizer = MockSummarizer::new("mock-bart").with_failure();
        let err = summarizer
            .summarize("text", &SummaryParams::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "mock-bart inference failed: mock summarization failure");
    }

    #[test]
    fn summarizer_trait_is_object_safe() {
        let summarizer: Box<dyn AbstractiveSummarizer> =
            Box::new(MockSummarizer::new("boxed").with_response("boxed summary"));
        assert_eq!(summarizer.model_name(), "boxed");
        assert_eq!(
            summarizer
                .summarize("x", &SummaryParams::default())
                .unwrap(),
            "boxed summary"
        );
    }
}
