//! Category → phrase tables for both extraction tiers.

use crate::error::{NotetakerError, Result};
use crate::extraction::entity::EntityCategory;
use std::collections::BTreeMap;

const SYMPTOM_PHRASES: &[&str] = &[
    "fever",
    "cough",
    "headache",
    "fatigue",
    "nausea",
    "pain",
    "shortness of breath",
    "chest pain",
    "hypertension",
];

const DIAGNOSIS_PHRASES: &[&str] = &[
    "hypertension",
    "diabetes",
    "asthma",
    "bronchitis",
    "influenza",
    "pneumonia",
];

const TREATMENT_PHRASES: &[&str] = &[
    "aspirin",
    "ibuprofen",
    "antibiotics",
    "paracetamol",
    "rest",
    "fluids",
    "inhaler",
];

const PROGNOSIS_PHRASES: &[&str] = &["good", "stable", "improving", "guarded", "chronic"];

/// Phrases per category, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    entries: BTreeMap<EntityCategory, Vec<String>>,
}

impl PatternTable {
    /// Empty table; add phrases with [`PatternTable::with_phrases`].
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Append phrases to a category. Blank phrases are skipped.
    pub fn with_phrases<S: AsRef<str>>(mut self, category: EntityCategory, phrases: &[S]) -> Self {
        let slot = self.entries.entry(category).or_default();
        for phrase in phrases {
            let phrase = phrase.as_ref().trim();
            if !phrase.is_empty() {
                slot.push(phrase.to_string());
            }
        }
        self
    }

    /// Build the precision table from `[extraction.patterns]`.
    ///
    /// An empty map selects the built-in table. Unknown category names are
    /// rejected so typos don't silently disable a category.
    pub fn from_config(patterns: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }

        let mut table = Self::empty();
        for (key, phrases) in patterns {
            let category =
                EntityCategory::from_key(key).ok_or_else(|| NotetakerError::ConfigInvalidValue {
                    key: format!("extraction.patterns.{key}"),
                    message: "unknown category (expected symptoms, diagnosis, treatment or prognosis)"
                        .to_string(),
                })?;
            table = table.with_phrases(category, phrases);
        }
        Ok(table)
    }

    /// Term list of the lexical fallback tier.
    ///
    /// Same as the built-in precision table except that "hypertension" is
    /// only a diagnosis term here.
    pub fn fallback_terms() -> Self {
        let symptoms: Vec<&str> = SYMPTOM_PHRASES
            .iter()
            .copied()
            .filter(|p| *p != "hypertension")
            .collect();
        Self::empty()
            .with_phrases(EntityCategory::Symptom, &symptoms)
            .with_phrases(EntityCategory::Diagnosis, DIAGNOSIS_PHRASES)
            .with_phrases(EntityCategory::Treatment, TREATMENT_PHRASES)
            .with_phrases(EntityCategory::Prognosis, PROGNOSIS_PHRASES)
    }

    pub fn phrases(&self, category: EntityCategory) -> &[String] {
        self.entries.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// (category, phrases) pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityCategory, &[String])> {
        self.entries.iter().map(|(c, p)| (*c, p.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::empty()
            .with_phrases(EntityCategory::Symptom, SYMPTOM_PHRASES)
            .with_phrases(EntityCategory::Diagnosis, DIAGNOSIS_PHRASES)
            .with_phrases(EntityCategory::Treatment, TREATMENT_PHRASES)
            .with_phrases(EntityCategory::Prognosis, PROGNOSIS_PHRASES)
    }
}
