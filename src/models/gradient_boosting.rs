//! Gradient boosting classifier
//!
//! Boosts shallow regression trees on the logistic loss: each stage fits the
//! residual between the labels and the current sigmoid score over a random
//! subsample of rows.

use super::{DecisionTree, ModelError, TaskType, TreeConfig};
use crate::data::ClassWeights;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Gradient boosting hyperparameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GbConfig {
    /// Number of boosting stages
    pub n_estimators: usize,
    /// Shrinkage applied to each stage's contribution
    pub learning_rate: f64,
    /// Depth of each stage's tree
    pub max_depth: usize,
    /// Fraction of rows sampled per stage
    pub subsample: f64,
    pub seed: u64,
}

impl Default for GbConfig {
    fn default() -> Self {
        Self {
            n_estimators: 50,
            learning_rate: 0.07,
            max_depth: 3,
            subsample: 0.8,
            seed: 42,
        }
    }
}

/// Gradient boosting model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoosting {
    config: GbConfig,
    /// Log-odds of the positive base rate
    init_score: f64,
    stages: Vec<DecisionTree>,
}

impl GradientBoosting {
    pub fn new(config: GbConfig) -> Self {
        Self {
            config,
            init_score: 0.0,
            stages: Vec::new(),
        }
    }

    pub fn config(&self) -> &GbConfig {
        &self.config
    }

    pub fn n_stages(&self) -> usize {
        self.stages.len()
    }

    fn stage_config(&self, stage_seed: u64) -> TreeConfig {
        TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: stage_seed,
            task: TaskType::Regression,
            class_weights: ClassWeights::uniform(),
        }
    }

    /// Train the boosting chain
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ModelError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(ModelError::TrainingFailed(
                "empty dataset or feature/label length mismatch".to_string(),
            ));
        }

        let n_samples = x.len();
        let positive_rate = (y.iter().sum::<f64>() / n_samples as f64).clamp(1e-6, 1.0 - 1e-6);
        self.init_score = (positive_rate / (1.0 - positive_rate)).ln();

        let mut scores = vec![self.init_score; n_samples];
        let sample_size =
            ((self.config.subsample * n_samples as f64).round() as usize).clamp(1, n_samples);

        self.stages = Vec::with_capacity(self.config.n_estimators);

        for stage in 0..self.config.n_estimators {
            let stage_seed = self.config.seed + stage as u64;
            let mut rng = ChaCha8Rng::seed_from_u64(stage_seed);

            let mut indices: Vec<usize> = (0..n_samples).collect();
            indices.shuffle(&mut rng);
            indices.truncate(sample_size);

            let stage_x: Vec<Vec<f64>> = indices.iter().map(|&i| x[i].clone()).collect();
            let residuals: Vec<f64> = indices
                .iter()
                .map(|&i| y[i] - sigmoid(scores[i]))
                .collect();

            let mut tree = DecisionTree::new(self.stage_config(stage_seed));
            tree.fit(&stage_x, &residuals)?;

            for (i, row) in x.iter().enumerate() {
                scores[i] += self.config.learning_rate * tree.predict_one(row)?;
            }

            if stage % 10 == 0 {
                let loss: f64 = y
                    .iter()
                    .zip(scores.iter())
                    .map(|(&target, &score)| {
                        let p = sigmoid(score).clamp(1e-12, 1.0 - 1e-12);
                        -(target * p.ln() + (1.0 - target) * (1.0 - p).ln())
                    })
                    .sum::<f64>()
                    / n_samples as f64;
                debug!(stage, loss, "boosting progress");
            }

            self.stages.push(tree);
        }

        Ok(())
    }

    fn raw_score(&self, features: &[f64]) -> Result<f64, ModelError> {
        if self.stages.is_empty() {
            return Err(ModelError::NotTrained);
        }

        let mut score = self.init_score;
        for tree in &self.stages {
            score += self.config.learning_rate * tree.predict_one(features)?;
        }
        Ok(score)
    }

    /// Positive-class probability for one sample
    pub fn predict_proba_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        Ok(sigmoid(self.raw_score(features)?))
    }

    /// Predicted class (0.0 or 1.0) for one sample
    pub fn predict_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        let proba = self.predict_proba_one(features)?;
        Ok(if proba >= 0.5 { 1.0 } else { 0.0 })
    }

    /// Predict a batch of samples
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        x.iter().map(|row| self.predict_one(row)).collect()
    }
}
