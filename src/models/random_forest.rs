//! Random forest classifier
//!
//! Bags seeded decision trees over bootstrap samples with per-split feature
//! subsampling. Trees are grown in parallel with rayon and vote by averaging
//! their leaf probabilities.

use super::{DecisionTree, ModelError, TaskType, TreeConfig};
use crate::data::ClassWeights;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Random forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features per split; None picks sqrt(n_features)
    pub max_features: Option<usize>,
    pub seed: u64,
    pub class_weights: ClassWeights,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 300,
            max_depth: 40,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
            class_weights: ClassWeights::uniform(),
        }
    }
}

/// Random forest model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn tree_config(&self, n_features: usize, tree_seed: u64) -> TreeConfig {
        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().round().max(1.0) as usize);

        TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: Some(max_features),
            seed: tree_seed,
            task: TaskType::Classification,
            class_weights: self.config.class_weights,
        }
    }

    /// Train the forest; each tree sees its own bootstrap sample
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ModelError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(ModelError::TrainingFailed(
                "empty dataset or feature/label length mismatch".to_string(),
            ));
        }

        let n_samples = x.len();
        let n_features = x[0].len();

        self.trees = (0..self.config.n_trees)
            .into_par_iter()
            .map(|t| {
                let tree_seed = self.config.seed + t as u64;
                let mut rng = ChaCha8Rng::seed_from_u64(tree_seed);

                let indices: Vec<usize> =
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
                let sample_x: Vec<Vec<f64>> =
                    indices.iter().map(|&i| x[i].clone()).collect();
                let sample_y: Vec<f64> = indices.iter().map(|&i| y[i]).collect();

                let mut tree = DecisionTree::new(self.tree_config(n_features, tree_seed));
                tree.fit(&sample_x, &sample_y)?;
                Ok(tree)
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        info!(n_trees = self.trees.len(), "forest trained");
        Ok(())
    }

    /// Positive-class probability: mean of the trees' leaf probabilities
    pub fn predict_proba_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotTrained);
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict_proba_one(features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    /// Predicted class (0.0 or 1.0) for one sample
    pub fn predict_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        let proba = self.predict_proba_one(features)?;
        Ok(if proba >= 0.5 { 1.0 } else { 0.0 })
    }

    /// Predict a batch of samples
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        x.par_iter().map(|row| self.predict_one(row)).collect()
    }
}
