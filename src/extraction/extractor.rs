//! Two-tier entity extraction plus zero-shot keyword detection.
//!
//! The precision tier matches the pattern table at token boundaries. When it
//! finds nothing, the lexical fallback looks for its terms anywhere in the
//! text.

use crate::config::ExtractionConfig;
use crate::defaults;
use crate::error::Result;
use crate::extraction::entity::{EntityCollection, EntitySource, ExtractedEntity};
use crate::extraction::lexical::LexicalFallback;
use crate::extraction::matcher::PhraseMatcher;
use crate::extraction::patterns::PatternTable;
use crate::inference::classifier::{ZeroShotClassifier, round_score};
use crate::pipeline::types::StageStatus;
use crate::text;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Clinical topic tag scored by the zero-shot classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordTag {
    pub keyword: String,
    pub confidence: f64,
}

/// Output of the extraction stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    pub entities: EntityCollection,
    pub keywords: Vec<KeywordTag>,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EntityReport {
    pub fn empty_input() -> Self {
        Self {
            entities: EntityCollection::new(),
            keywords: Vec::new(),
            status: StageStatus::EmptyInput,
            error: None,
        }
    }

    /// Error payload with empty collections.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            entities: EntityCollection::new(),
            keywords: Vec::new(),
            status: StageStatus::Error,
            error: Some(format!("Entity extraction failed: {}", message.into())),
        }
    }
}

/// Tier confidences and keyword settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionSettings {
    pub precision_confidence: f64,
    pub fallback_confidence: f64,
    pub keyword_threshold: f64,
    pub keywords_enabled: bool,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            precision_confidence: defaults::PRECISION_CONFIDENCE,
            fallback_confidence: defaults::FALLBACK_CONFIDENCE,
            keyword_threshold: defaults::KEYWORD_THRESHOLD,
            keywords_enabled: true,
        }
    }
}

impl From<&ExtractionConfig> for ExtractionSettings {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            precision_confidence: config.precision_confidence,
            fallback_confidence: config.fallback_confidence,
            keyword_threshold: config.keyword_threshold,
            keywords_enabled: config.keywords_enabled,
        }
    }
}

/// Two-tier entity extraction plus classifier-based keyword tagging.
pub struct EntityExtractor {
    matcher: PhraseMatcher,
    fallback: LexicalFallback,
    classifier: Arc<dyn ZeroShotClassifier>,
    settings: ExtractionSettings,
}

impl EntityExtractor {
    /// Extractor over the built-in pattern table with default settings.
    pub fn new(classifier: Arc<dyn ZeroShotClassifier>) -> Result<Self> {
        Self::with_table(&PatternTable::default(), classifier, ExtractionSettings::default())
    }

    pub fn with_table(
        table: &PatternTable,
        classifier: Arc<dyn ZeroShotClassifier>,
        settings: ExtractionSettings,
    ) -> Result<Self> {
        Ok(Self {
            matcher: PhraseMatcher::new(table),
            fallback: LexicalFallback::with_builtin_terms()?,
            classifier,
            settings,
        })
    }

    pub fn from_config(config: &ExtractionConfig, classifier: Arc<dyn ZeroShotClassifier>) -> Result<Self> {
        let table = PatternTable::from_config(&config.patterns)?;
        Self::with_table(&table, classifier, config.into())
    }

    /// Categorized entities; the fallback tier runs only when the precision
    /// tier found nothing in any category.
    pub fn extract_entities(&self, text: &str) -> EntityCollection {
        let mut collection = EntityCollection::new();
        if text::is_blank(text) {
            return collection;
        }

        for found in self.matcher.find_all(text) {
            collection.push_unique(ExtractedEntity {
                value: found.text(text).to_string(),
                category: found.category,
                confidence: self.settings.precision_confidence,
                source: EntitySource::PrecisionMatch,
            });
        }

        if collection.is_empty() {
            debug!("Precision tier found nothing, running lexical fallback");
            for hit in self.fallback.scan(text) {
                collection.push_unique(ExtractedEntity {
                    value: hit.value,
                    category: hit.category,
                    confidence: self.settings.fallback_confidence,
                    source: EntitySource::LexicalFallback,
                });
            }
        }

        collection
    }

    /// Topic tags above the threshold, in classifier ranking order.
    ///
    /// Classifier failures are logged and yield no tags.
    pub fn extract_keywords(&self, text: &str) -> Vec<KeywordTag> {
        if !self.settings.keywords_enabled || text::is_blank(text) {
            return Vec::new();
        }

        match self.classifier.classify(text, defaults::KEYWORD_LABELS, true) {
            Ok(classification) => classification
                .ranked()
                .iter()
                .filter(|s| s.score > self.settings.keyword_threshold)
                .map(|s| KeywordTag {
                    keyword: s.label.clone(),
                    confidence: round_score(s.score),
                })
                .collect(),
            Err(e) => {
                error!(error = %e, "Keyword extraction failed");
                Vec::new()
            }
        }
    }

    /// Full extraction stage. Never panics on blank input or backend failure.
    pub fn process(&self, text: &str) -> EntityReport {
        if text::is_blank(text) {
            return EntityReport::empty_input();
        }

        let entities = self.extract_entities(text);
        let keywords = self.extract_keywords(text);
        debug!(
            entities = entities.total(),
            keywords = keywords.len(),
            "Entity extraction complete"
        );

        EntityReport {
            entities,
            keywords,
            status: StageStatus::Success,
            error: None,
        }
    }

    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }
}
