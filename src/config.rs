//! TOML configuration with environment overrides.
//!
//! Loaded from `notetaker/config.toml` under the user config directory
//! unless `--config` points elsewhere. Every section has defaults, so a partial file is enough.
//! `NOTETAKER_*` variables and `HF_API_TOKEN` are applied after loading.

use crate::defaults;
use crate::error::{NotetakerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub classifier: ClassifierConfig,
    pub summarizer: SummarizerConfig,
    pub output: OutputConfig,
}

/// Entity extraction and keyword tagging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Confidence stamped on precision-tier entities.
    pub precision_confidence: f64,
    /// Confidence stamped on lexical-fallback entities.
    pub fallback_confidence: f64,
    /// Keyword tags must score strictly above this.
    pub keyword_threshold: f64,
    pub keywords_enabled: bool,
    /// Category name → phrases. Replaces the built-in precision table when non-empty.
    pub patterns: BTreeMap<String, Vec<String>>,
}

/// Zero-shot classification backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub model: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

/// Abstractive summarization backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummarizerConfig {
    pub endpoint: String,
    pub model: String,
    pub api_token: Option<String>,
    pub max_length: u32,
    pub min_length: u32,
    pub timeout_secs: u64,
}

/// Audit document persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub pretty: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            precision_confidence: defaults::PRECISION_CONFIDENCE,
            fallback_confidence: defaults::FALLBACK_CONFIDENCE,
            keyword_threshold: defaults::KEYWORD_THRESHOLD,
            keywords_enabled: true,
            patterns: BTreeMap::new(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_API_URL.to_string(),
            model: defaults::DEFAULT_CLASSIFIER_MODEL.to_string(),
            api_token: None,
            timeout_secs: defaults::INFERENCE_TIMEOUT_SECS,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_API_URL.to_string(),
            model: defaults::DEFAULT_SUMMARIZER_MODEL.to_string(),
            api_token: None,
            max_length: defaults::SUMMARY_MAX_LENGTH,
            min_length: defaults::SUMMARY_MIN_LENGTH,
            timeout_secs: defaults::INFERENCE_TIMEOUT_SECS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(defaults::OUTPUT_DIR),
            pretty: true,
        }
    }
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SummarizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NotetakerError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                NotetakerError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(NotetakerError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - NOTETAKER_API_URL → classifier.endpoint and summarizer.endpoint
    /// - NOTETAKER_CLASSIFIER_MODEL → classifier.model
    /// - NOTETAKER_SUMMARIZER_MODEL → summarizer.model
    /// - NOTETAKER_OUTPUT_DIR → output.directory
    /// - HF_API_TOKEN → api_token of any backend that has none configured
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("NOTETAKER_API_URL")
            && !url.is_empty()
        {
            self.classifier.endpoint = url.clone();
            self.summarizer.endpoint = url;
        }

        if let Ok(model) = std::env::var("NOTETAKER_CLASSIFIER_MODEL")
            && !model.is_empty()
        {
            self.classifier.model = model;
        }

        if let Ok(model) = std::env::var("NOTETAKER_SUMMARIZER_MODEL")
            && !model.is_empty()
        {
            self.summarizer.model = model;
        }

        if let Ok(dir) = std::env::var("NOTETAKER_OUTPUT_DIR")
            && !dir.is_empty()
        {
            self.output.directory = PathBuf::from(dir);
        }

        if let Ok(token) = std::env::var("HF_API_TOKEN")
            && !token.is_empty()
        {
            if self.classifier.api_token.is_none() {
                self.classifier.api_token = Some(token.clone());
            }
            if self.summarizer.api_token.is_none() {
                self.summarizer.api_token = Some(token);
            }
        }

        self
    }

    /// Reject values that would make the pipeline misbehave at runtime.
    pub fn validate(&self) -> Result<()> {
        let unit_interval = [
            ("extraction.precision_confidence", self.extraction.precision_confidence),
            ("extraction.fallback_confidence", self.extraction.fallback_confidence),
            ("extraction.keyword_threshold", self.extraction.keyword_threshold),
        ];
        for (key, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(key, format!("{value} is outside [0, 1]")));
            }
        }

        if self.summarizer.max_length == 0 {
            return Err(invalid("summarizer.max_length", "must be positive".to_string()));
        }
        if self.summarizer.min_length > self.summarizer.max_length {
            return Err(invalid(
                "summarizer.min_length",
                format!(
                    "{} exceeds max_length {}",
                    self.summarizer.min_length, self.summarizer.max_length
                ),
            ));
        }

        for (key, secs) in [
            ("classifier.timeout_secs", self.classifier.timeout_secs),
            ("summarizer.timeout_secs", self.summarizer.timeout_secs),
        ] {
            if secs == 0 || secs > defaults::MAX_TIMEOUT_SECS {
                return Err(invalid(
                    key,
                    format!("must be between 1 and {} (got {secs})", defaults::MAX_TIMEOUT_SECS),
                ));
            }
        }

        if self.classifier.model.trim().is_empty() {
            return Err(invalid("classifier.model", "must not be empty".to_string()));
        }
        if self.summarizer.model.trim().is_empty() {
            return Err(invalid("summarizer.model", "must not be empty".to_string()));
        }

        Ok(())
    }

    /// Serialize to TOML, e.g. for `config show`.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NotetakerError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/notetaker/config.toml on Linux, or None when the
    /// platform has no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("notetaker").join("config.toml"))
    }
}

fn invalid(key: &str, message: String) -> NotetakerError {
    NotetakerError::ConfigInvalidValue {
        key: key.to_string(),
        message,
    }
}
