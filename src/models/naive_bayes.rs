//! Multinomial Naive Bayes classifier
//!
//! Trains on non-negative TF-IDF rows with Laplace smoothing in log space.
//! `NbGridSearch` tunes the smoothing strength and prior handling with
//! stratified cross-validation scored by macro F1.

use super::ModelError;
use crate::data::{stratified_folds, TextDataset};
use crate::metrics::ClassificationMetrics;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Naive Bayes hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NbConfig {
    /// Laplace smoothing strength
    pub alpha: f64,
    /// Learn class priors from the data; false means uniform priors
    pub fit_prior: bool,
}

impl Default for NbConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            fit_prior: true,
        }
    }
}

/// Multinomial Naive Bayes for binary classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    config: NbConfig,
    /// Log prior per class, index 0 = negative, 1 = positive
    log_prior: Vec<f64>,
    /// Per-class log feature probabilities (2 x n_features)
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

impl MultinomialNb {
    pub fn new(config: NbConfig) -> Self {
        Self {
            config,
            log_prior: Vec::new(),
            feature_log_prob: Vec::new(),
            n_features: 0,
        }
    }

    pub fn config(&self) -> &NbConfig {
        &self.config
    }

    /// Train on feature rows; all values must be non-negative
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ModelError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(ModelError::TrainingFailed(
                "empty dataset or feature/label length mismatch".to_string(),
            ));
        }

        self.n_features = x[0].len();

        // Per-class feature mass and document counts
        let mut class_counts = [0usize; 2];
        let mut feature_sums = vec![vec![0.0f64; self.n_features]; 2];

        for (row, &label) in x.iter().zip(y.iter()) {
            let class = usize::from(label >= 0.5);
            class_counts[class] += 1;
            for (sum, &value) in feature_sums[class].iter_mut().zip(row.iter()) {
                *sum += value;
            }
        }

        if class_counts[0] == 0 || class_counts[1] == 0 {
            return Err(ModelError::TrainingFailed(
                "training data must contain both classes".to_string(),
            ));
        }

        self.log_prior = if self.config.fit_prior {
            let n = x.len() as f64;
            class_counts
                .iter()
                .map(|&c| (c as f64 / n).ln())
                .collect()
        } else {
            vec![(0.5f64).ln(); 2]
        };

        let alpha = self.config.alpha;
        self.feature_log_prob = feature_sums
            .iter()
            .map(|sums| {
                let total: f64 = sums.iter().sum::<f64>() + alpha * self.n_features as f64;
                sums.iter().map(|&s| ((s + alpha) / total).ln()).collect()
            })
            .collect();

        Ok(())
    }

    /// Joint log likelihood per class for one sample
    fn joint_log_likelihood(&self, features: &[f64]) -> Result<[f64; 2], ModelError> {
        if self.feature_log_prob.is_empty() {
            return Err(ModelError::NotTrained);
        }
        if features.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }

        let mut scores = [0.0f64; 2];
        for class in 0..2 {
            let mut score = self.log_prior[class];
            for (&value, &log_prob) in features.iter().zip(self.feature_log_prob[class].iter()) {
                if value > 0.0 {
                    score += value * log_prob;
                }
            }
            scores[class] = score;
        }
        Ok(scores)
    }

    /// Predicted class (0.0 or 1.0) for one sample
    pub fn predict_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        let scores = self.joint_log_likelihood(features)?;
        Ok(if scores[1] > scores[0] { 1.0 } else { 0.0 })
    }

    /// Positive-class probability for one sample
    pub fn predict_proba_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        let scores = self.joint_log_likelihood(features)?;
        // Softmax over two classes, shifted for stability
        let max = scores[0].max(scores[1]);
        let exp0 = (scores[0] - max).exp();
        let exp1 = (scores[1] - max).exp();
        Ok(exp1 / (exp0 + exp1))
    }

    /// Predict a batch of samples
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        x.iter().map(|row| self.predict_one(row)).collect()
    }
}

/// Outcome of the Naive Bayes grid search
#[derive(Debug, Clone)]
pub struct NbSearchOutcome {
    /// Best model refit on the full training data
    pub best: MultinomialNb,
    pub best_alpha: f64,
    pub best_fit_prior: bool,
    /// Mean cross-validated macro F1 of the winning candidate
    pub best_score: f64,
}

/// Exhaustive grid search over smoothing strength and prior handling
#[derive(Debug, Clone)]
pub struct NbGridSearch {
    pub alphas: Vec<f64>,
    pub fit_priors: Vec<bool>,
    pub n_folds: usize,
    pub seed: u64,
}

impl Default for NbGridSearch {
    fn default() -> Self {
        Self {
            alphas: vec![0.1, 0.5, 1.0, 2.0],
            fit_priors: vec![true, false],
            n_folds: 4,
            seed: 42,
        }
    }
}

impl NbGridSearch {
    /// Run the search and refit the winner on the full dataset
    pub fn search(&self, dataset: &TextDataset) -> Result<NbSearchOutcome, ModelError> {
        let folds = stratified_folds(&dataset.labels, self.n_folds, self.seed);
        let all_indices: Vec<usize> = (0..dataset.n_samples()).collect();

        let mut best_score = f64::NEG_INFINITY;
        let mut best_config = NbConfig::default();

        for &alpha in &self.alphas {
            for &fit_prior in &self.fit_priors {
                let config = NbConfig { alpha, fit_prior };
                let mut fold_scores = Vec::with_capacity(folds.len());

                for fold in &folds {
                    let in_fold: std::collections::HashSet<usize> =
                        fold.iter().copied().collect();
                    let train_indices: Vec<usize> = all_indices
                        .iter()
                        .copied()
                        .filter(|i| !in_fold.contains(i))
                        .collect();

                    let train = dataset.subset(&train_indices);
                    let valid = dataset.subset(fold);

                    let mut model = MultinomialNb::new(config);
                    model.fit(&train.features, &train.labels)?;
                    let predictions = model.predict(&valid.features)?;

                    let metrics = ClassificationMetrics::calculate(&valid.labels, &predictions);
                    fold_scores.push(metrics.macro_f1);
                }

                let mean_score: f64 =
                    fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
                debug!(alpha, fit_prior, score = mean_score, "grid candidate scored");

                if mean_score > best_score {
                    best_score = mean_score;
                    best_config = config;
                }
            }
        }

        info!(
            alpha = best_config.alpha,
            fit_prior = best_config.fit_prior,
            score = best_score,
            "grid search complete"
        );

        let mut best = MultinomialNb::new(best_config);
        best.fit(&dataset.features, &dataset.labels)?;

        Ok(NbSearchOutcome {
            best,
            best_alpha: best_config.alpha,
            best_fit_prior: best_config.fit_prior,
            best_score,
        })
    }
}
