//! Word-frequency concept mining for the local analysis path

use std::collections::HashMap;

/// Words shorter than this never become concepts
const MIN_CONCEPT_LEN: usize = 5;

/// Filler words long enough to survive the length filter
const FREQUENCY_STOPWORDS: &[&str] = &[
    "about", "above", "across", "after", "again", "against", "along", "among", "around", "based",
    "because", "become", "before", "being", "below", "between", "could", "doing", "during",
    "either", "every", "first", "following", "further", "given", "great", "having", "however",
    "include", "including", "itself", "later", "least", "might", "never", "often", "other",
    "others", "provide", "provides", "rather", "really", "several", "should", "since", "still",
    "their", "theirs", "there", "therefore", "these", "thing", "things", "think", "those",
    "though", "three", "through", "today", "under", "until", "using", "various", "where",
    "whether", "which", "while", "within", "without", "would", "years",
];

/// A concept and how many times it appeared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFrequency {
    pub term: String,
    pub count: usize,
}

/// Top `limit` concepts by descending frequency.
///
/// Words are lowercased, kept when at least five characters long and not on
/// the filler list. Ties keep first-seen order.
pub fn top_concepts(text: &str, limit: usize) -> Vec<TermFrequency> {
    // term -> (count, first position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

    let words = text
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase);

    for (position, word) in words.enumerate() {
        if word.chars().count() < MIN_CONCEPT_LEN || FREQUENCY_STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(term, (count, first))| (term, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(term, count, _)| TermFrequency { term, count })
        .collect()
}

/// Case-insensitive count of non-overlapping occurrences of `term` in `text`
pub fn count_occurrences(text: &str, term: &str) -> usize {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(needle.as_str()).count()
}
