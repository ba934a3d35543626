use serde::Serialize;
use std::fmt;

/// Clinical category an extracted entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityCategory {
    Symptom,
    Diagnosis,
    Treatment,
    Prognosis,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 4] = [
        EntityCategory::Symptom,
        EntityCategory::Diagnosis,
        EntityCategory::Treatment,
        EntityCategory::Prognosis,
    ];

    /// Key used for this category in serialized entity collections.
    pub fn collection_key(self) -> &'static str {
        match self {
            EntityCategory::Symptom => "Symptoms",
            EntityCategory::Diagnosis => "Diagnosis",
            EntityCategory::Treatment => "Treatment",
            EntityCategory::Prognosis => "Prognosis",
        }
    }

    /// Parse a category name as written in config files.
    ///
    /// Case-insensitive; singular and plural forms are both accepted.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "symptom" | "symptoms" => Some(EntityCategory::Symptom),
            "diagnosis" | "diagnoses" => Some(EntityCategory::Diagnosis),
            "treatment" | "treatments" => Some(EntityCategory::Treatment),
            "prognosis" | "prognoses" => Some(EntityCategory::Prognosis),
            _ => None,
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityCategory::Symptom => "Symptom",
            EntityCategory::Diagnosis => "Diagnosis",
            EntityCategory::Treatment => "Treatment",
            EntityCategory::Prognosis => "Prognosis",
        };
        f.write_str(name)
    }
}

/// Which extraction tier produced an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntitySource {
    #[serde(rename = "precision-match")]
    PrecisionMatch,
    #[serde(rename = "lexical-fallback")]
    LexicalFallback,
}

impl fmt::Display for EntitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntitySource::PrecisionMatch => f.write_str("precision-match"),
            EntitySource::LexicalFallback => f.write_str("lexical-fallback"),
        }
    }
}

/// A clinical term found in a transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedEntity {
    /// Matched text with the transcript's original casing.
    pub value: String,
    #[serde(skip)]
    pub category: EntityCategory,
    pub confidence: f64,
    pub source: EntitySource,
}

/// Entities grouped by category, in first-seen order.
///
/// Within a category no two entries share a lowercase value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EntityCollection {
    #[serde(rename = "Symptoms")]
    symptoms: Vec<ExtractedEntity>,
    #[serde(rename = "Diagnosis")]
    diagnosis: Vec<ExtractedEntity>,
    #[serde(rename = "Treatment")]
    treatment: Vec<ExtractedEntity>,
    #[serde(rename = "Prognosis")]
    prognosis: Vec<ExtractedEntity>,
}

impl EntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, category: EntityCategory) -> &Vec<ExtractedEntity> {
        match category {
            EntityCategory::Symptom => &self.symptoms,
            EntityCategory::Diagnosis => &self.diagnosis,
            EntityCategory::Treatment => &self.treatment,
            EntityCategory::Prognosis => &self.prognosis,
        }
    }

    fn slot_mut(&mut self, category: EntityCategory) -> &mut Vec<ExtractedEntity> {
        match category {
            EntityCategory::Symptom => &mut self.symptoms,
            EntityCategory::Diagnosis => &mut self.diagnosis,
            EntityCategory::Treatment => &mut self.treatment,
            EntityCategory::Prognosis => &mut self.prognosis,
        }
    }

    /// Append unless the category already holds the same value ignoring case.
    ///
    /// Returns whether the entity was added.
    pub fn push_unique(&mut self, entity: ExtractedEntity) -> bool {
        let key = entity.value.to_lowercase();
        let slot = self.slot_mut(entity.category);
        if slot.iter().any(|e| e.value.to_lowercase() == key) {
            return false;
        }
        slot.push(entity);
        true
    }

    pub fn get(&self, category: EntityCategory) -> &[ExtractedEntity] {
        self.slot(category)
    }

    /// Entity values of one category, in order.
    pub fn values(&self, category: EntityCategory) -> Vec<String> {
        self.slot(category).iter().map(|e| e.value.clone()).collect()
    }

    pub fn total(&self) -> usize {
        EntityCategory::ALL
            .iter()
            .map(|c| self.slot(*c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All entities, category by category.
    pub fn iter(&self) -> impl Iterator<Item = &ExtractedEntity> {
        EntityCategory::ALL
            .into_iter()
            .flat_map(move |c| self.slot(c).iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(value: &str, category: EntityCategory) -> ExtractedEntity {
        ExtractedEntity {
            value: value.to_string(),
            category,
            confidence: 0.98,
            source: EntitySource::PrecisionMatch,
        }
    }

    #[test]
    fn from_key_accepts_singular_and_plural() {
        assert_eq!(EntityCategory::from_key("Symptoms"), Some(EntityCategory::Symptom));
        assert_eq!(EntityCategory::from_key("symptom"), Some(EntityCategory::Symptom));
        assert_eq!(EntityCategory::from_key(" DIAGNOSIS "), Some(EntityCategory::Diagnosis));
        assert_eq!(EntityCategory::from_key("treatments"), Some(EntityCategory::Treatment));
        assert_eq!(EntityCategory::from_key("prognosis"), Some(EntityCategory::Prognosis));
        assert_eq!(EntityCategory::from_key("vitals"), None);
    }

    #[test]
    fn collection_key_round_trips_through_from_key() {
        for category in EntityCategory::ALL {
            assert_eq!(EntityCategory::from_key(category.collection_key()), Some(category));
        }
    }

    #[test]
    fn push_unique_deduplicates_case_insensitively_first_wins() {
        let mut collection = EntityCollection::new();
        assert!(collection.push_unique(entity("Fever", EntityCategory::Symptom)));
        assert!(!collection.push_unique(entity("fever", EntityCategory::Symptom)));

        let symptoms = collection.get(EntityCategory::Symptom);
        assert_eq!(symptoms.len(), 1);
        assert_eq!(symptoms[0].value, "Fever");
    }

    #[test]
    fn dedup_is_scoped_to_one_category() {
        // Only the lexical fallback can offer one value under two categories;
        // the phrase matcher already settles on a single category per span.
        let mut collection = EntityCollection::new();
        assert!(collection.push_unique(entity("pain", EntityCategory::Symptom)));
        assert!(!collection.push_unique(entity("Pain", EntityCategory::Symptom)));
        assert!(collection.push_unique(entity("pain", EntityCategory::Prognosis)));
        assert_eq!(collection.get(EntityCategory::Symptom).len(), 1);
        assert_eq!(collection.total(), 2);
    }

    #[test]
    fn values_preserve_insertion_order() {
        let mut collection = EntityCollection::new();
        collection.push_unique(entity("rest", EntityCategory::Treatment));
        collection.push_unique(entity("aspirin", EntityCategory::Treatment));
        assert_eq!(
            collection.values(EntityCategory::Treatment),
            vec!["rest".to_string(), "aspirin".to_string()]
        );
    }

    #[test]
    fn empty_collection_serializes_all_four_keys() {
        let json = serde_json::to_value(EntityCollection::new()).unwrap();
        for key in ["Symptoms", "Diagnosis", "Treatment", "Prognosis"] {
            assert_eq!(json[key], serde_json::json!([]), "missing key {}", key);
        }
    }

    #[test]
    fn entity_serializes_value_confidence_and_source() {
        let mut collection = EntityCollection::new();
        collection.push_unique(ExtractedEntity {
            value: "cough".to_string(),
            category: EntityCategory::Symptom,
            confidence: 0.9,
            source: EntitySource::LexicalFallback,
        });
        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(
            json["Symptoms"][0],
            serde_json::json!({"value": "cough", "confidence": 0.9, "source": "lexical-fallback"})
        );
    }

    #[test]
    fn iter_walks_categories_in_order() {
        let mut collection = EntityCollection::new();
        collection.push_unique(entity("stable", EntityCategory::Prognosis));
        collection.push_unique(entity("fever", EntityCategory::Symptom));
        let values: Vec<&str> = collection.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["fever", "stable"]);
    }
}
