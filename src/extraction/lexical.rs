//! Substring fallback tier.
//!
//! Deliberately less precise than the phrase matcher: a term matches anywhere,
//! including inside longer words ("painful" yields "pain").

use crate::error::{NotetakerError, Result};
use crate::extraction::entity::EntityCategory;
use crate::extraction::patterns::PatternTable;
use regex::{Regex, RegexBuilder};

/// A fallback hit: category and the first occurrence's original casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalHit {
    pub category: EntityCategory,
    pub value: String,
}

#[derive(Debug)]
struct Term {
    category: EntityCategory,
    pattern: Regex,
}

/// Case-insensitive substring search over a per-category term list.
#[derive(Debug)]
pub struct LexicalFallback {
    terms: Vec<Term>,
}

impl LexicalFallback {
    pub fn new(table: &PatternTable) -> Result<Self> {
        let mut terms = Vec::with_capacity(table.len());
        for (category, phrases) in table.iter() {
            for phrase in phrases {
                let pattern = RegexBuilder::new(&regex::escape(phrase))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| NotetakerError::Other(format!("fallback term '{phrase}': {e}")))?;
                terms.push(Term { category, pattern });
            }
        }
        Ok(Self { terms })
    }

    /// Built-in fallback term list.
    pub fn with_builtin_terms() -> Result<Self> {
        Self::new(&PatternTable::fallback_terms())
    }

    /// One hit per term found in `text`, in term-list order.
    pub fn scan(&self, text: &str) -> Vec<LexicalHit> {
        self.terms
            .iter()
            .filter_map(|term| {
                term.pattern.find(text).map(|m| LexicalHit {
                    category: term.category,
                    value: m.as_str().to_string(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
