//! Latent Dirichlet Allocation, batch variational Bayes
//!
//! Topic-word parameters start from Gamma(100, 0.01) draws and are refined
//! by `max_iter` full EM passes. Each E-step re-draws the per-document
//! topic parameters from the same generator, so a fit is fully determined
//! by the seed and the input matrix.

use super::vectorizer::DocumentTermMatrix;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma};

const INIT_GAMMA_SHAPE: f64 = 100.0;
const INIT_GAMMA_SCALE: f64 = 0.01;
const MAX_DOC_UPDATE_ITER: usize = 100;
const MEAN_CHANGE_TOL: f64 = 1e-3;

#[derive(Debug, Clone)]
pub struct LdaParams {
    pub n_topics: usize,
    pub max_iter: usize,
    pub seed: u64,
    /// Dirichlet prior on per-document topic mixtures (alpha)
    pub doc_topic_prior: f64,
    /// Dirichlet prior on per-topic term distributions (eta)
    pub topic_word_prior: f64,
}

impl LdaParams {
    /// Priors default to `1 / n_topics`
    pub fn new(n_topics: usize, max_iter: usize, seed: u64) -> Self {
        let prior = 1.0 / n_topics.max(1) as f64;
        Self {
            n_topics,
            max_iter,
            seed,
            doc_topic_prior: prior,
            topic_word_prior: prior,
        }
    }
}

pub struct LatentDirichletAllocation {
    params: LdaParams,
}

impl LatentDirichletAllocation {
    pub fn new(params: LdaParams) -> Self {
        Self { params }
    }

    /// Fit the model and return the topic-term weights
    ///
    /// The result is `n_topics x dtm.n_terms()` non-negative weights
    /// (unnormalized variational parameters), one row per topic.
    pub fn fit(&self, dtm: &DocumentTermMatrix) -> Result<Array2<f64>> {
        let k = self.params.n_topics;
        let v = dtm.n_terms();
        if k == 0 {
            return Err(Error::InvalidConfig("number of topics must be at least 1".into()));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let init = Gamma::new(INIT_GAMMA_SHAPE, INIT_GAMMA_SCALE)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        let draws: Vec<f64> = (0..k * v).map(|_| init.sample(&mut rng)).collect();
        let mut components = Array2::from_shape_vec((k, v), draws)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        let mut exp_topic_word = exp_dirichlet_expectation_2d(&components);

        for iteration in 0..self.params.max_iter {
            let mut suff_stats = Array2::<f64>::zeros((k, v));

            for row in &dtm.rows {
                let doc_topic: Array1<f64> = (0..k).map(|_| init.sample(&mut rng)).collect();
                self.update_document(row, doc_topic, &exp_topic_word, &mut suff_stats);
            }

            components = &suff_stats * &exp_topic_word + self.params.topic_word_prior;
            exp_topic_word = exp_dirichlet_expectation_2d(&components);

            tracing::debug!("[LDA] Finished EM iteration {}/{}", iteration + 1, self.params.max_iter);
        }

        Ok(components)
    }

    /// E-step for one document; accumulates its sufficient statistics
    fn update_document(
        &self,
        row: &[(usize, f64)],
        mut doc_topic: Array1<f64>,
        exp_topic_word: &Array2<f64>,
        suff_stats: &mut Array2<f64>,
    ) {
        let alpha = self.params.doc_topic_prior;
        let ids: Vec<usize> = row.iter().map(|&(term, _)| term).collect();
        let counts: Array1<f64> = row.iter().map(|&(_, count)| count).collect();

        // k x n_d slice of the topic-word expectations for this document's terms
        let exp_topic_word_d = exp_topic_word.select(Axis(1), &ids);
        let mut exp_doc_topic = exp_dirichlet_expectation(&doc_topic);

        for _ in 0..MAX_DOC_UPDATE_ITER {
            let norm_phi = exp_doc_topic.dot(&exp_topic_word_d) + f64::EPSILON;
            let next = &exp_doc_topic * &exp_topic_word_d.dot(&(&counts / &norm_phi)) + alpha;

            exp_doc_topic = exp_dirichlet_expectation(&next);
            let change = mean_change(&doc_topic, &next);
            doc_topic = next;
            if change < MEAN_CHANGE_TOL {
                break;
            }
        }

        let norm_phi = exp_doc_topic.dot(&exp_topic_word_d) + f64::EPSILON;
        for ((&term, count), norm) in ids.iter().zip(&counts).zip(&norm_phi) {
            suff_stats
                .column_mut(term)
                .scaled_add(count / norm, &exp_doc_topic);
        }
    }
}

fn mean_change(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    (a - b).mapv(f64::abs).mean().unwrap_or(0.0)
}

/// `exp(E[log X])` for X ~ Dirichlet(params)
pub(crate) fn exp_dirichlet_expectation(params: &Array1<f64>) -> Array1<f64> {
    let psi_total = digamma(params.sum());
    params.mapv(|p| (digamma(p) - psi_total).exp())
}

/// Row-wise [`exp_dirichlet_expectation`]
fn exp_dirichlet_expectation_2d(params: &Array2<f64>) -> Array2<f64> {
    let mut out = params.clone();
    for mut row in out.rows_mut() {
        let psi_total = digamma(row.sum());
        row.mapv_inplace(|p| (digamma(p) - psi_total).exp());
    }
    out
}

/// Digamma function for positive arguments
///
/// Shifts the argument above 6 with the recurrence, then applies the
/// asymptotic expansion.
pub(crate) fn digamma(mut x: f64) -> f64 {
    let mut result = 0.0;
    while x < 6.0 {
        result -= 1.0 / x;
        x += 1.0;
    }
    let inv = 1.0 / x;
    let inv2 = inv * inv;
    result + x.ln()
        - 0.5 * inv
        - inv2
            * (1.0 / 12.0
                - inv2 * (1.0 / 120.0 - inv2 * (1.0 / 252.0 - inv2 * (1.0 / 240.0 - inv2 / 132.0))))
}
