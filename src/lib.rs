//! notetaker - auditable SOAP notes from clinical conversation transcripts
//!
//! Extracts medical entities, classifies sentiment and intent, summarizes the
//! conversation and synthesizes a SOAP note, all recorded in one audit document.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod extraction;
pub mod inference;
pub mod logging;
#[cfg(feature = "cli")]
pub mod output;
pub mod pipeline;
pub mod sentiment;
pub mod soap;
pub mod summary;
pub mod text;

// Composition root - needs the CLI surface and real backends
#[cfg(all(feature = "cli", feature = "http-backends"))]
pub mod app;

// Collaborator traits
pub use inference::{AbstractiveSummarizer, ZeroShotClassifier};
pub use pipeline::store::AuditStore;

// Components
pub use extraction::{EntityCategory, EntityCollection, EntityExtractor, EntityReport};
pub use sentiment::{SentimentIntentAnalyzer, SentimentIntentReport};
pub use soap::{SoapNote, SoapSynthesizer};
pub use summary::{SummaryResult, Summarizer};

// Pipeline
pub use inference::InferenceBackends;
pub use pipeline::{AuditDocument, AuditOutcome, FailureEnvelope, Pipeline, StageStatus};

// Error handling
pub use error::{NotetakerError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        // In a git repo build, GIT_HASH is set → expect "0.1.0+<hash>"
        // In CI without git, expect plain "0.1.0"
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(
                ver.contains('+'),
                "With GIT_HASH set, version should contain '+', got: {}",
                ver
            );
            let hash_part = ver.split('+').nth(1).unwrap_or("");
            assert_eq!(
                hash_part.len(),
                7,
                "Git hash should be 7 chars, got: {}",
                hash_part
            );
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
