//! Process-wide registry of shared inference handles.
//!
//! Backends are read-only once built. They are created once (possibly slowly)
//! and then shared by every request through `Arc` clones.

use crate::error::{NotetakerError, Result};
use crate::inference::classifier::ZeroShotClassifier;
use crate::inference::summarizer::AbstractiveSummarizer;
use std::sync::{Arc, OnceLock};

#[cfg(feature = "http-backends")]
use crate::config::Config;

static BACKENDS: OnceLock<InferenceBackends> = OnceLock::new();

/// Shared handles to both inference collaborators.
///
/// The classifier serves sentiment, intent and keyword tagging alike.
#[derive(Clone)]
pub struct InferenceBackends {
    pub classifier: Arc<dyn ZeroShotClassifier>,
    pub summarizer: Arc<dyn AbstractiveSummarizer>,
}

impl std::fmt::Debug for InferenceBackends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceBackends")
            .field("classifier", &self.classifier.model_name())
            .field("summarizer", &self.summarizer.model_name())
            .finish()
    }
}

impl InferenceBackends {
    pub fn new(
        classifier: Arc<dyn ZeroShotClassifier>,
        summarizer: Arc<dyn AbstractiveSummarizer>,
    ) -> Self {
        Self {
            classifier,
            summarizer,
        }
    }

    /// Build the HTTP backends described by `config`.
    ///
    /// Blocking: the HTTP client must be created and dropped outside an async
    /// runtime worker, so callers on tokio wrap this in `spawn_blocking`.
    #[cfg(feature = "http-backends")]
    pub fn from_config(config: &Config) -> Result<Self> {
        use crate::inference::huggingface::{HfSummarizer, HfZeroShotClassifier};

        let classifier = HfZeroShotClassifier::new(&config.classifier)?;
        let summarizer = HfSummarizer::new(&config.summarizer)?;
        Ok(Self::new(Arc::new(classifier), Arc::new(summarizer)))
    }

    /// Install `backends` as the process-wide registry.
    ///
    /// Fails if a registry was already installed; the first one stays in place.
    pub fn install(backends: InferenceBackends) -> Result<&'static InferenceBackends> {
        BACKENDS.set(backends).map_err(|rejected| NotetakerError::BackendInit {
            backend: "registry".to_string(),
            message: format!("already initialized (rejected {:?})", rejected),
        })?;
        Self::global().ok_or_else(|| NotetakerError::Other("registry vanished".to_string()))
    }

    /// The installed registry, if any.
    pub fn global() -> Option<&'static InferenceBackends> {
        BACKENDS.get()
    }

    /// Build from config and install, or return the registry already installed.
    #[cfg(feature = "http-backends")]
    pub fn init_global(config: &Config) -> Result<&'static InferenceBackends> {
        if let Some(existing) = Self::global() {
            return Ok(existing);
        }
        let backends = Self::from_config(config)?;
        if BACKENDS.set(backends).is_err() {
            tracing::debug!("Inference registry initialized concurrently, keeping the first");
        }
        Self::global().ok_or_else(|| NotetakerError::Other("registry vanished".to_string()))
    }
}
