//! Stacking ensemble
//!
//! Combines the four base classifiers through a logistic regression trained
//! on out-of-fold probability predictions, so the combiner never sees a
//! probability produced by a model that trained on that same row.

use super::{
    DecisionTree, ForestConfig, GbConfig, GradientBoosting, LogisticConfig, LogisticRegression,
    ModelError, MultinomialNb, NbConfig, RandomForest, TreeConfig,
};
use crate::data::stratified_folds;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Number of base models feeding the combiner
const N_BASE_MODELS: usize = 4;

/// Stacking configuration, including every base model's hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackingConfig {
    /// Folds used to generate out-of-fold meta-features
    pub n_folds: usize,
    pub seed: u64,
    pub nb: NbConfig,
    pub forest: ForestConfig,
    pub boosting: GbConfig,
    pub tree: TreeConfig,
    pub combiner: LogisticConfig,
}

impl Default for StackingConfig {
    fn default() -> Self {
        Self {
            n_folds: 5,
            seed: 42,
            nb: NbConfig::default(),
            forest: ForestConfig::default(),
            boosting: GbConfig::default(),
            tree: TreeConfig::default(),
            combiner: LogisticConfig::default(),
        }
    }
}

/// Stacked ensemble of NB, random forest, gradient boosting and a decision
/// tree, combined by logistic regression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackingEnsemble {
    config: StackingConfig,
    nb: MultinomialNb,
    forest: RandomForest,
    boosting: GradientBoosting,
    tree: DecisionTree,
    combiner: LogisticRegression,
    trained: bool,
}

impl StackingEnsemble {
    pub fn new(config: StackingConfig) -> Self {
        Self {
            nb: MultinomialNb::new(config.nb),
            forest: RandomForest::new(config.forest.clone()),
            boosting: GradientBoosting::new(config.boosting),
            tree: DecisionTree::new(config.tree.clone()),
            combiner: LogisticRegression::new(config.combiner),
            config,
            trained: false,
        }
    }

    pub fn config(&self) -> &StackingConfig {
        &self.config
    }

    /// Probabilities from the four base models, in combiner input order
    fn base_probabilities(
        nb: &MultinomialNb,
        forest: &RandomForest,
        boosting: &GradientBoosting,
        tree: &DecisionTree,
        features: &[f64],
    ) -> Result<[f64; N_BASE_MODELS], ModelError> {
        Ok([
            nb.predict_proba_one(features)?,
            forest.predict_proba_one(features)?,
            boosting.predict_proba_one(features)?,
            tree.predict_proba_one(features)?,
        ])
    }

    /// Train the ensemble
    ///
    /// Meta-features are produced out-of-fold, the combiner is fit on them,
    /// and the base models are then refit on the full dataset.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ModelError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(ModelError::TrainingFailed(
                "empty dataset or feature/label length mismatch".to_string(),
            ));
        }

        let n_samples = x.len();
        let folds = stratified_folds(y, self.config.n_folds, self.config.seed);
        let mut meta = vec![[0.0f64; N_BASE_MODELS]; n_samples];

        for (fold_idx, fold) in folds.iter().enumerate() {
            let in_fold: HashSet<usize> = fold.iter().copied().collect();
            let train_indices: Vec<usize> =
                (0..n_samples).filter(|i| !in_fold.contains(i)).collect();

            let train_x: Vec<Vec<f64>> =
                train_indices.iter().map(|&i| x[i].clone()).collect();
            let train_y: Vec<f64> = train_indices.iter().map(|&i| y[i]).collect();

            let mut nb = MultinomialNb::new(self.config.nb);
            let mut forest = RandomForest::new(self.config.forest.clone());
            let mut boosting = GradientBoosting::new(self.config.boosting);
            let mut tree = DecisionTree::new(self.config.tree.clone());

            nb.fit(&train_x, &train_y)?;
            forest.fit(&train_x, &train_y)?;
            boosting.fit(&train_x, &train_y)?;
            tree.fit(&train_x, &train_y)?;

            for &i in fold {
                meta[i] = Self::base_probabilities(&nb, &forest, &boosting, &tree, &x[i])?;
            }

            debug!(fold = fold_idx, held_out = fold.len(), "fold meta-features generated");
        }

        let flat: Vec<f64> = meta.iter().flatten().copied().collect();
        let meta_matrix = Array2::from_shape_vec((n_samples, N_BASE_MODELS), flat)
            .map_err(|e| ModelError::TrainingFailed(e.to_string()))?;
        let targets = Array1::from_vec(y.to_vec());

        self.combiner.fit(&meta_matrix, &targets)?;

        // Final base models see all the data
        self.nb.fit(x, y)?;
        self.forest.fit(x, y)?;
        self.boosting.fit(x, y)?;
        self.tree.fit(x, y)?;
        self.trained = true;

        info!(n_samples, folds = self.config.n_folds, "stacking ensemble trained");
        Ok(())
    }

    /// Positive-class probability for one sample
    pub fn predict_proba_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        if !self.trained {
            return Err(ModelError::NotTrained);
        }

        let meta = Self::base_probabilities(
            &self.nb,
            &self.forest,
            &self.boosting,
            &self.tree,
            features,
        )?;
        self.combiner.predict_proba_one(&meta)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ClassificationMetrics;

    fn separable_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..80 {
            let v = i as f64 / 8.0;
            x.push(vec![v, 10.0 - v, (i % 3) as f64 * 0.1]);
            y.push(if v > 5.0 { 1.0 } else { 0.0 });
        }
        (x, y)
    }

    fn small_config() -> StackingConfig {
        StackingConfig {
            n_folds: 3,
            forest: ForestConfig {
                n_trees: 10,
                max_depth: 5,
                ..Default::default()
            },
            boosting: GbConfig {
                n_estimators: 10,
                ..Default::default()
            },
            tree: TreeConfig {
                max_depth: 5,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_ensemble_learns_separable_data() {
        let (x, y) = separable_data();
        let mut ensemble = StackingEnsemble::new(small_config());
        ensemble.fit(&x, &y).unwrap();

        let predictions = ensemble.predict(&x).unwrap();
        let metrics = ClassificationMetrics::calculate(&y, &predictions);
        assert!(metrics.accuracy > 0.9);
    }

    #[test]
    fn test_probability_in_range() {
        let (x, y) = separable_data();
        let mut ensemble = StackingEnsemble::new(small_config());
        ensemble.fit(&x, &y).unwrap();

        let proba = ensemble.predict_proba_one(&x[0]).unwrap();
        assert!((0.0..=1.0).contains(&proba));
    }

    #[test]
    fn test_untrained_errors() {
        let ensemble = StackingEnsemble::new(small_config());
        assert!(matches!(
            ensemble.predict_one(&[1.0, 2.0, 3.0]),
            Err(ModelError::NotTrained)
        ));
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let (x, y) = separable_data();

        let mut a = StackingEnsemble::new(small_config());
        a.fit(&x, &y).unwrap();
        let mut b = StackingEnsemble::new(small_config());
        b.fit(&x, &y).unwrap();

        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }
}
