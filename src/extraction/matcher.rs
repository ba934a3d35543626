//! Token-level phrase matcher for the precision tier.
//!
//! Phrases are compiled into a trie keyed by lowercase tokens. Scanning walks
//! the transcript's tokens left to right and, at each position, takes the
//! longest phrase that starts there. Matches never overlap, so "chest pain"
//! wins over "pain" inside the same span.
//!
//! Each phrase carries a single category. A phrase listed under more than
//! one category keeps the first one registered, so table order (Symptoms,
//! Diagnosis, Treatment, Prognosis) decides.

use crate::extraction::entity::EntityCategory;
use crate::extraction::patterns::PatternTable;
use std::collections::HashMap;
use std::ops::Range;

/// A word in the source text: lowercase form plus its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    lower: String,
    span: Range<usize>,
}

/// Split text into alphanumeric runs. Everything else separates tokens.
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_alphanumeric() {
            if start.is_none() {
                start = Some(idx);
            }
        } else if let Some(s) = start.take() {
            tokens.push(Token {
                lower: text[s..idx].to_lowercase(),
                span: s..idx,
            });
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            lower: text[s..].to_lowercase(),
            span: s..text.len(),
        });
    }

    tokens
}

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<String, usize>,
    /// Category of the phrase ending at this node.
    category: Option<EntityCategory>,
}

/// One phrase occurrence in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    pub category: EntityCategory,
    /// Byte range into the scanned text.
    pub span: Range<usize>,
}

impl PhraseMatch {
    /// The matched slice with its original casing.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

/// Longest-match-first phrase matcher over a category → phrase table.
#[derive(Debug)]
pub struct PhraseMatcher {
    nodes: Vec<TrieNode>,
    phrase_count: usize,
}

impl PhraseMatcher {
    pub fn new(table: &PatternTable) -> Self {
        let mut matcher = Self {
            nodes: vec![TrieNode::default()],
            phrase_count: 0,
        };
        for (category, phrases) in table.iter() {
            for phrase in phrases {
                matcher.insert(phrase, category);
            }
        }
        matcher
    }

    fn insert(&mut self, phrase: &str, category: EntityCategory) {
        let tokens = tokenize(phrase);
        if tokens.is_empty() {
            return;
        }

        let mut node = 0;
        for token in tokens {
            node = match self.nodes[node].children.get(&token.lower) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(token.lower, next);
                    next
                }
            };
        }

        let terminal = &mut self.nodes[node];
        if terminal.category.is_none() {
            terminal.category = Some(category);
            self.phrase_count += 1;
        }
    }

    /// Number of distinct phrases.
    pub fn len(&self) -> usize {
        self.phrase_count
    }

    pub fn is_empty(&self) -> bool {
        self.phrase_count == 0
    }

    /// Scan `text` and return matches in text order, one per span.
    pub fn find_all(&self, text: &str) -> Vec<PhraseMatch> {
        let tokens = tokenize(text);
        let mut matches = Vec::new();
        let mut pos = 0;

        while pos < tokens.len() {
            match self.longest_at(&tokens, pos) {
                Some((end, category)) => {
                    matches.push(PhraseMatch {
                        category,
                        span: tokens[pos].span.start..tokens[end - 1].span.end,
                    });
                    pos = end;
                }
                None => pos += 1,
            }
        }

        matches
    }

    /// Longest phrase starting at token `start`: (end token index exclusive, its category).
    fn longest_at(&self, tokens: &[Token], start: usize) -> Option<(usize, EntityCategory)> {
        let mut node = 0;
        let mut best = None;

        for (offset, token) in tokens[start..].iter().enumerate() {
            match self.nodes[node].children.get(&token.lower) {
                Some(&next) => node = next,
                None => break,
            }
            if let Some(category) = self.nodes[node].category {
                best = Some((start + offset + 1, category));
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_matcher() -> PhraseMatcher {
        PhraseMatcher::new(&PatternTable::default())
    }

    fn matched(text: &str) -> Vec<(EntityCategory, String)> {
        default_matcher()
            .find_all(text)
            .iter()
            .map(|m| (m.category, m.text(text).to_string()))
            .collect()
    }

    #[test]
    fn tokenize_splits_on_punctuation_and_whitespace() {
        let tokens = tokenize("BP 130/85, Fever.");
        let lowers: Vec<&str> = tokens.iter().map(|t| t.lower.as_str()).collect();
        assert_eq!(lowers, vec!["bp", "130", "85", "fever"]);
        assert_eq!(tokens[3].span, 11..16);
    }

    #[test]
    fn tokenize_empty_text() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" ... ").is_empty());
    }

    #[test]
    fn single_token_match_keeps_original_casing() {
        assert_eq!(
            matched("Patient has FEVER."),
            vec![(EntityCategory::Symptom, "FEVER".to_string())]
        );
    }

    #[test]
    fn multi_token_phrase_beats_its_last_token() {
        assert_eq!(
            matched("Complains of chest pain today"),
            vec![(EntityCategory::Symptom, "chest pain".to_string())]
        );
    }

    #[test]
    fn multi_token_phrase_spans_original_separators() {
        assert_eq!(
            matched("some Shortness  of\nbreath at night"),
            vec![(EntityCategory::Symptom, "Shortness  of\nbreath".to_string())]
        );
    }

    #[test]
    fn partial_multi_token_prefix_falls_back_to_shorter_matches() {
        // "chest" alone is not a phrase; "pain" still matches afterwards.
        assert_eq!(
            matched("chest tightness and pain"),
            vec![(EntityCategory::Symptom, "pain".to_string())]
        );
    }

    #[test]
    fn word_boundaries_are_respected() {
        // Substrings inside other words never match at token level.
        assert!(matched("The painting is restful and goodness knows").is_empty());
    }

    #[test]
    fn phrase_in_two_categories_keeps_first_registered() {
        assert_eq!(
            matched("history of hypertension"),
            vec![(EntityCategory::Symptom, "hypertension".to_string())]
        );

        let table = PatternTable::empty()
            .with_phrases(EntityCategory::Diagnosis, &["asthma"])
            .with_phrases(EntityCategory::Treatment, &["asthma"]);
        let matcher = PhraseMatcher::new(&table);
        assert_eq!(matcher.len(), 1);
        let found = matcher.find_all("asthma");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, EntityCategory::Diagnosis);
    }

    #[test]
    fn matches_are_in_text_order() {
        let found = matched("Prescribed antibiotics for bronchitis; prognosis stable.");
        assert_eq!(
            found,
            vec![
                (EntityCategory::Treatment, "antibiotics".to_string()),
                (EntityCategory::Diagnosis, "bronchitis".to_string()),
                (EntityCategory::Prognosis, "stable".to_string()),
            ]
        );
    }

    #[test]
    fn duplicate_registration_is_counted_once() {
        let table = PatternTable::empty()
            .with_phrases(EntityCategory::Symptom, &["cough", "Cough"]);
        let matcher = PhraseMatcher::new(&table);
        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.find_all("a cough").len(), 1);
    }

    #[test]
    fn default_table_registrations() {
        assert_eq!(default_matcher().len(), 26);
        assert!(PhraseMatcher::new(&PatternTable::empty()).is_empty());
    }
}
