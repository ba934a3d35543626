//! Inference backends: zero-shot classification and abstractive summarization.

pub mod classifier;
#[cfg(feature = "http-backends")]
pub mod huggingface;
pub mod registry;
pub mod summarizer;

pub use classifier::{Classification, LabelScore, MockClassifier, ZeroShotClassifier, round_score};
pub use registry::InferenceBackends;
pub use summarizer::{AbstractiveSummarizer, MockSummarizer, SummaryParams};
