//! Topic pattern discovery over the interaction log
//!
//! Information Hiding:
//! - Tokenization and vocabulary layout hidden in the vectorizer
//! - Variational inference details hidden in the LDA module
//! - Callers only see records in and ranked terms out

pub mod lda;
pub mod vectorizer;

use crate::error::{Error, Result};
use crate::storage::InteractionRecord;
use lda::{LatentDirichletAllocation, LdaParams};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use vectorizer::CountVectorizer;

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub num_topics: usize,
    pub top_words_per_topic: usize,
    pub random_seed: u64,
    /// Number of EM passes over the corpus
    pub max_iter: usize,
    pub stop_words: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            num_topics: 5,
            top_words_per_topic: 10,
            random_seed: 42,
            max_iter: 10,
            stop_words: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_topics == 0 {
            return Err(Error::InvalidConfig("num_topics must be at least 1".into()));
        }
        if self.top_words_per_topic == 0 {
            return Err(Error::InvalidConfig("top_words_per_topic must be at least 1".into()));
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidConfig("max_iter must be at least 1".into()));
        }
        Ok(())
    }
}

/// One discovered topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicResult {
    pub topic_index: usize,
    /// Highest-weight terms, lowest weight first
    pub top_terms: Vec<String>,
}

/// Extracts recurring themes from a set of interactions
#[derive(Debug, Clone, Default)]
pub struct PatternAnalyzer {
    config: AnalysisConfig,
}

impl PatternAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Fit a topic model over `records` and report the top terms per topic
    ///
    /// # Errors
    /// * `InsufficientData` - `records` is empty, checked before anything else
    /// * `InvalidConfig` - a count in the configuration is zero
    /// * `InsufficientVocabulary` - fewer than two distinct terms after tokenization
    pub fn discover(&self, records: &[InteractionRecord]) -> Result<Vec<TopicResult>> {
        if records.is_empty() {
            return Err(Error::InsufficientData);
        }
        self.config.validate()?;

        let documents: Vec<String> = records.iter().map(InteractionRecord::document).collect();
        let dtm = CountVectorizer::new()
            .with_stop_words(&self.config.stop_words)
            .fit_transform(&documents);

        if dtm.n_terms() < 2 {
            return Err(Error::InsufficientVocabulary { terms: dtm.n_terms() });
        }

        tracing::info!(
            "[PatternAnalyzer] Fitting {} topic(s) over {} documents, {} terms",
            self.config.num_topics,
            dtm.n_documents(),
            dtm.n_terms()
        );

        let params = LdaParams::new(
            self.config.num_topics,
            self.config.max_iter,
            self.config.random_seed,
        );
        let components = LatentDirichletAllocation::new(params).fit(&dtm)?;

        Ok(components
            .rows()
            .into_iter()
            .enumerate()
            .map(|(topic_index, weights)| TopicResult {
                topic_index,
                top_terms: top_terms(weights, &dtm.vocabulary, self.config.top_words_per_topic),
            })
            .collect())
    }
}

/// Convenience wrapper around [`PatternAnalyzer::discover`]
pub fn discover(records: &[InteractionRecord], config: &AnalysisConfig) -> Result<Vec<TopicResult>> {
    PatternAnalyzer::new(config.clone()).discover(records)
}

/// The `n` highest-weight terms in ascending weight order
///
/// Terms are ranked by weight, equal weights by term; the last `n` of the
/// ranking are returned. Every term is returned when `n` exceeds the
/// vocabulary.
fn top_terms(weights: ArrayView1<f64>, vocabulary: &[String], n: usize) -> Vec<String> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| {
        weights[a]
            .total_cmp(&weights[b])
            .then_with(|| vocabulary[a].cmp(&vocabulary[b]))
    });
    let start = order.len().saturating_sub(n);
    order[start..].iter().map(|&i| vocabulary[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ndarray::array;

    fn records(pairs: &[(&str, &str)]) -> Vec<InteractionRecord> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (q, a))| InteractionRecord {
                id: i as i64 + 1,
                question: q.to_string(),
                answer: a.to_string(),
                timestamp: Utc::now(),
            })
            .collect()
    }

    fn arithmetic_corpus() -> Vec<InteractionRecord> {
        records(&[
            ("What is 2+2?", "4"),
            ("What is the capital of France?", "Paris"),
            ("What is 3+3?", "6"),
        ])
    }

    #[test]
    fn test_empty_records_is_insufficient_data() {
        let result = PatternAnalyzer::default().discover(&[]);
        assert!(matches!(result, Err(Error::InsufficientData)));
    }

    #[test]
    fn test_single_term_is_insufficient_vocabulary() {
        let corpus = records(&[("hello", "HELLO"), ("hello?", "hello!")]);
        let result = PatternAnalyzer::default().discover(&corpus);
        assert!(matches!(result, Err(Error::InsufficientVocabulary { terms: 1 })));
    }

    #[test]
    fn test_stop_words_can_exhaust_vocabulary() {
        let config = AnalysisConfig {
            stop_words: vec!["the".into(), "a".into()],
            ..Default::default()
        };
        let result = discover(&records(&[("the", "a")]), &config);
        assert!(matches!(result, Err(Error::InsufficientVocabulary { terms: 0 })));
    }

    #[test]
    fn test_zero_counts_rejected() {
        let corpus = arithmetic_corpus();
        for config in [
            AnalysisConfig { num_topics: 0, ..Default::default() },
            AnalysisConfig { top_words_per_topic: 0, ..Default::default() },
            AnalysisConfig { max_iter: 0, ..Default::default() },
        ] {
            assert!(matches!(discover(&corpus, &config), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_single_topic_scenario() {
        let config = AnalysisConfig {
            num_topics: 1,
            top_words_per_topic: 3,
            ..Default::default()
        };
        let topics = discover(&arithmetic_corpus(), &config).unwrap();

        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].topic_index, 0);

        // "2" and "3" tie on two occurrences, "is" and "what" on three;
        // ties rank by term, so "3" outranks "2" and "what" comes last
        assert_eq!(topics[0].top_terms, vec!["3", "is", "what"]);
    }

    #[test]
    fn test_empty_records_checked_before_config() {
        let config = AnalysisConfig {
            num_topics: 0,
            ..Default::default()
        };
        assert!(matches!(discover(&[], &config), Err(Error::InsufficientData)));
    }

    #[test]
    fn test_default_config_yields_five_topics_of_ten_terms() {
        let corpus = records(&[
            ("How do I borrow a value in Rust?", "Use a reference with the ampersand operator."),
            ("What does the borrow checker do?", "It enforces aliasing rules at compile time."),
            ("Best pasta recipe?", "Boil water, add salt, cook pasta, add tomato sauce."),
            ("How long to cook rice?", "Simmer rice for about eighteen minutes."),
        ]);
        let topics = PatternAnalyzer::default().discover(&corpus).unwrap();

        assert_eq!(topics.len(), 5);
        for (i, topic) in topics.iter().enumerate() {
            assert_eq!(topic.topic_index, i);
            assert_eq!(topic.top_terms.len(), 10);
        }
    }

    #[test]
    fn test_discover_is_deterministic() {
        let corpus = records(&[
            ("Explain ownership in Rust", "Each value has a single owner."),
            ("Explain borrowing in Rust", "References borrow values without owning them."),
            ("Recommend a sci-fi novel", "Try reading Dune by Frank Herbert."),
            ("Another novel suggestion?", "Hyperion is a classic sci-fi novel."),
        ]);
        let config = AnalysisConfig {
            num_topics: 2,
            top_words_per_topic: 4,
            ..Default::default()
        };

        let first = discover(&corpus, &config).unwrap();
        let second = discover(&corpus, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_small_vocabulary_returns_every_term() {
        let config = AnalysisConfig {
            num_topics: 2,
            top_words_per_topic: 10,
            ..Default::default()
        };
        let topics = discover(&records(&[("alpha", "beta")]), &config).unwrap();
        for topic in topics {
            let mut terms = topic.top_terms.clone();
            terms.sort();
            assert_eq!(terms, vec!["alpha", "beta"]);
        }
    }

    #[test]
    fn test_top_terms_orders_ascending_and_breaks_ties_by_term() {
        let vocabulary: Vec<String> = ["apple", "banana", "cherry", "date"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let weights = array![2.0, 5.0, 2.0, 1.0];

        assert_eq!(top_terms(weights.view(), &vocabulary, 3), vec!["apple", "cherry", "banana"]);
        assert_eq!(top_terms(weights.view(), &vocabulary, 2), vec!["cherry", "banana"]);
        assert_eq!(top_terms(weights.view(), &vocabulary, 10).len(), 4);
    }
}
