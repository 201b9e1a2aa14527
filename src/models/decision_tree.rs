//! Decision tree (CART) implementation
//!
//! Supports weighted gini classification for the standalone tree, the random
//! forest and the stacking base learner, and variance-reduction regression
//! for the gradient boosting stages.

use super::ModelError;
use crate::data::ClassWeights;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TaskType {
    Regression,
    Classification,
}

/// Decision tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of the tree
    pub max_depth: usize,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Random seed for feature subsampling
    pub seed: u64,
    pub task: TaskType,
    /// Sample weights per class (classification only)
    pub class_weights: ClassWeights,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 40,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
            task: TaskType::Classification,
            class_weights: ClassWeights::uniform(),
        }
    }
}

/// Tree node
///
/// Leaf `value` is the weighted positive-class probability for
/// classification and the mean target for regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub feature_idx: Option<usize>,
    pub threshold: Option<f64>,
    pub value: f64,
    pub n_samples: usize,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn leaf(value: f64, n_samples: usize) -> Self {
        Self {
            feature_idx: None,
            threshold: None,
            value,
            n_samples,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Per-node statistics accumulated during split search
#[derive(Debug, Clone, Copy, Default)]
struct NodeStats {
    /// Sum of sample weights
    w: f64,
    /// Weighted sum of targets
    wy: f64,
    /// Weighted sum of squared targets
    wyy: f64,
    /// Raw sample count
    n: usize,
}

impl NodeStats {
    fn add(&mut self, y: f64, weight: f64) {
        self.w += weight;
        self.wy += weight * y;
        self.wyy += weight * y * y;
        self.n += 1;
    }

    /// Node value: weighted mean target (= positive probability when y is
    /// 0/1)
    fn value(&self) -> f64 {
        if self.w > 0.0 {
            self.wy / self.w
        } else {
            0.0
        }
    }

    /// Weighted impurity times weight mass, so gains across children add up
    fn weighted_impurity(&self, task: TaskType) -> f64 {
        if self.w <= 0.0 {
            return 0.0;
        }
        match task {
            TaskType::Classification => {
                let p = self.wy / self.w;
                self.w * 2.0 * p * (1.0 - p)
            }
            TaskType::Regression => {
                let mean = self.wy / self.w;
                self.w * (self.wyy / self.w - mean * mean).max(0.0)
            }
        }
    }
}

/// Decision tree model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
    n_features: usize,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            n_features: 0,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    fn sample_weight(&self, y: f64) -> f64 {
        match self.config.task {
            TaskType::Classification => self.config.class_weights.weight(y),
            TaskType::Regression => 1.0,
        }
    }

    /// Train the tree
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ModelError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(ModelError::TrainingFailed(
                "empty dataset or feature/label length mismatch".to_string(),
            ));
        }

        self.n_features = x[0].len();
        let indices: Vec<usize> = (0..x.len()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        self.root = Some(self.build_tree(x, y, &indices, 0, &mut rng));
        Ok(())
    }

    fn node_stats(&self, y: &[f64], indices: &[usize]) -> NodeStats {
        let mut stats = NodeStats::default();
        for &i in indices {
            stats.add(y[i], self.sample_weight(y[i]));
        }
        stats
    }

    fn build_tree(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let stats = self.node_stats(y, indices);
        let impurity = stats.weighted_impurity(self.config.task);

        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || impurity < 1e-12
        {
            return TreeNode::leaf(stats.value(), indices.len());
        }

        let Some((feature_idx, threshold)) = self.find_best_split(x, y, indices, &stats, rng)
        else {
            return TreeNode::leaf(stats.value(), indices.len());
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[i][feature_idx] <= threshold);

        if left_indices.len() < self.config.min_samples_leaf
            || right_indices.len() < self.config.min_samples_leaf
        {
            return TreeNode::leaf(stats.value(), indices.len());
        }

        let left = self.build_tree(x, y, &left_indices, depth + 1, rng);
        let right = self.build_tree(x, y, &right_indices, depth + 1, rng);

        TreeNode {
            feature_idx: Some(feature_idx),
            threshold: Some(threshold),
            value: stats.value(),
            n_samples: indices.len(),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    /// Find the split with the largest impurity decrease
    ///
    /// Each candidate feature is scanned once over its sorted values, moving
    /// samples from the right accumulator to the left and scoring every
    /// boundary between distinct values.
    fn find_best_split(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
        parent: &NodeStats,
        rng: &mut ChaCha8Rng,
    ) -> Option<(usize, f64)> {
        let max_features = self.config.max_features.unwrap_or(self.n_features);

        let mut feature_indices: Vec<usize> = (0..self.n_features).collect();
        feature_indices.shuffle(rng);
        feature_indices.truncate(max_features);

        let parent_impurity = parent.weighted_impurity(self.config.task);

        let mut best_gain = 1e-12;
        let mut best_split: Option<(usize, f64)> = None;

        for &feature_idx in &feature_indices {
            let mut sorted: Vec<(f64, f64, f64)> = indices
                .iter()
                .map(|&i| (x[i][feature_idx], y[i], self.sample_weight(y[i])))
                .collect();
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left = NodeStats::default();
            let mut right = *parent;

            for window_end in 0..sorted.len() - 1 {
                let (value, target, weight) = sorted[window_end];
                left.add(target, weight);
                right.w -= weight;
                right.wy -= weight * target;
                right.wyy -= weight * target * target;
                right.n -= 1;

                let next_value = sorted[window_end + 1].0;
                if next_value - value <= 1e-12 {
                    continue;
                }

                if left.n < self.config.min_samples_leaf
                    || right.n < self.config.min_samples_leaf
                {
                    continue;
                }

                let gain = parent_impurity
                    - left.weighted_impurity(self.config.task)
                    - right.weighted_impurity(self.config.task);

                if gain > best_gain {
                    best_gain = gain;
                    best_split = Some((feature_idx, (value + next_value) / 2.0));
                }
            }
        }

        best_split
    }

    fn leaf_value(&self, features: &[f64]) -> Result<f64, ModelError> {
        let mut node = self.root.as_ref().ok_or(ModelError::NotTrained)?;

        if features.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }

        loop {
            match (node.feature_idx, node.threshold, &node.left, &node.right) {
                (Some(feature_idx), Some(threshold), Some(left), Some(right)) => {
                    node = if features[feature_idx] <= threshold {
                        left
                    } else {
                        right
                    };
                }
                _ => return Ok(node.value),
            }
        }
    }

    /// Predict one sample: class 0/1 for classification, value for regression
    pub fn predict_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        let value = self.leaf_value(features)?;
        Ok(match self.config.task {
            TaskType::Classification => {
                if value >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            TaskType::Regression => value,
        })
    }

    /// Positive-class probability for one sample (classification)
    pub fn predict_proba_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.leaf_value(features)
    }

    /// Predict a batch of samples
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        x.iter().map(|row| self.predict_one(row)).collect()
    }
}
