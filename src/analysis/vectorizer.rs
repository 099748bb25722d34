//! Document-term count matrix
//!
//! Tokenization rule: the document is lowercased (Unicode), then every
//! maximal run of word characters (`\w+`: letters, marks, digits and
//! connector punctuation) is a token. Single-character tokens are kept.
//! Stop words are removed after lowercasing. The vocabulary is the set of
//! distinct tokens in code-point order, so term indices never depend on
//! document order or hashing.

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::OnceLock;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\w+").expect("static token pattern"))
}

/// Split `text` into lowercase word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Sparse raw-count representation of a corpus
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTermMatrix {
    /// Sorted distinct terms; a term's index is its position here
    pub vocabulary: Vec<String>,
    /// One row per document: `(term index, count)` pairs in index order
    pub rows: Vec<Vec<(usize, f64)>>,
}

impl DocumentTermMatrix {
    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    /// Count of `term` in document `doc`, zero when absent
    pub fn count(&self, doc: usize, term: &str) -> f64 {
        let Ok(idx) = self.vocabulary.binary_search_by(|t| t.as_str().cmp(term)) else {
            return 0.0;
        };
        self.rows
            .get(doc)
            .and_then(|row| row.iter().find(|(i, _)| *i == idx))
            .map(|(_, c)| *c)
            .unwrap_or(0.0)
    }
}

/// Bag-of-words vectorizer with an optional stop-word list
#[derive(Debug, Clone, Default)]
pub struct CountVectorizer {
    stop_words: HashSet<String>,
}

impl CountVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        self
    }

    fn terms(&self, document: &str) -> Vec<String> {
        tokenize(document)
            .into_iter()
            .filter(|t| !self.stop_words.contains(t))
            .collect()
    }

    /// Learn the vocabulary and count terms for every document
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> DocumentTermMatrix {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| self.terms(d.as_ref())).collect();

        let vocabulary: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let index: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for token in tokens {
                    *counts.entry(index[token.as_str()]).or_insert(0.0) += 1.0;
                }
                counts.into_iter().collect()
            })
            .collect();

        DocumentTermMatrix { vocabulary, rows }
    }
}
