//! Clinical entity extraction.
//!
//! Two tiers: a token-level phrase matcher (precision) and a substring scan
//! (lexical fallback) that only runs when the first tier finds nothing.

pub mod entity;
pub mod extractor;
pub mod lexical;
pub mod matcher;
pub mod patterns;

pub use entity::{EntityCategory, EntityCollection, EntitySource, ExtractedEntity};
pub use extractor::{EntityExtractor, EntityReport, ExtractionSettings, KeywordTag};
pub use lexical::LexicalFallback;
pub use matcher::{PhraseMatch, PhraseMatcher};
pub use patterns::PatternTable;
