//! Heuristic entity extraction from free text
//!
//! Candidates come from three lexical passes over the text:
//!
//! 1. Capitalized words (`Apple`, `California`) that are not closed-class words
//! 2. Runs of 2–4 capitalized words inside one sentence (`Apple Inc`)
//! 3. All-uppercase acronyms (`NASA`, `HTTP`)
//!
//! The passes are unioned into one duplicate-free list. Extraction is pure
//! and deterministic: identical input always yields the identical list.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Closed-class and light words that are often capitalized at the start of a
/// sentence but never name anything on their own
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because",
    "been", "before", "being", "both", "but", "by", "can", "could", "did", "do", "does", "during",
    "each", "every", "for", "from", "gave", "get", "give", "got", "had", "has", "have", "he",
    "her", "here", "his", "how", "however", "if", "in", "into", "is", "it", "its", "just", "let",
    "made", "make", "many", "may", "might", "more", "most", "must", "not", "of", "on", "only",
    "or", "our", "shall", "she", "should", "so", "some", "such", "take", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "through", "to", "took",
    "under", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "why",
    "will", "with", "would", "yet", "you", "your",
];

/// Minimum length of a multi-word phrase candidate
const MIN_PHRASE_LEN: usize = 6;

/// Check whether a word is on the extractor's stopword list (case-insensitive)
pub fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOPWORDS.contains(&lower.as_str())
}

/// Split text into sentences on `.`, `!` and `?`, dropping blank pieces
pub fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Capitalized word: one uppercase letter, then lowercase letters
static CAPITALIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Lu}\p{Ll}+$").expect("valid capitalized-word pattern"));

/// Two to four capitalized words separated by single spaces
static PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\p{Lu}\p{Ll}+(?: \p{Lu}\p{Ll}+){1,3}\b").expect("valid phrase pattern")
});

static ACRONYM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\p{Lu}{3,6}\b").expect("valid acronym pattern"));

/// Extractor for entity candidates.
///
/// Every candidate is a span of the input: tokens lose leading and trailing
/// punctuation only, never inner characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityExtractor;

impl EntityExtractor {
    /// Create a new entity extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract entity candidates from text
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let mut result = ExtractionResult::default();

        if text.trim().is_empty() {
            return result;
        }

        for token in text.split_whitespace() {
            let word = token.trim_matches(|c: char| !c.is_alphanumeric());
            if word.chars().count() > 2 && CAPITALIZED.is_match(word) && !is_stopword(word) {
                result.insert(word.to_string());
            }
        }

        for sentence in split_sentences(text) {
            for m in PHRASE.find_iter(sentence) {
                let phrase = m.as_str();
                let first_word = phrase.split(' ').next().unwrap_or_default();
                if phrase.chars().count() >= MIN_PHRASE_LEN && !is_stopword(first_word) {
                    result.insert(phrase.to_string());
                }
            }
        }

        for m in ACRONYM.find_iter(text) {
            result.insert(m.as_str().to_string());
        }

        result
    }
}

/// Duplicate-free list of entity candidates, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    entities: Vec<String>,
    seen: HashSet<String>,
}

impl ExtractionResult {
    /// Add a candidate; returns false if it was already present
    pub fn insert(&mut self, entity: String) -> bool {
        if self.seen.contains(&entity) {
            return false;
        }
        self.seen.insert(entity.clone());
        self.entities.push(entity);
        true
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.seen.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Check if any entities were extracted
    pub fn has_entities(&self) -> bool {
        !self.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entities
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entities
    }
}
