//! Feature datasets, stratified splitting and class weights

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Dense feature matrix with binary labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextDataset {
    /// Feature rows (n_samples x n_features)
    pub features: Vec<Vec<f64>>,
    /// Encoded labels (0.0 = FAKE, 1.0 = REAL)
    pub labels: Vec<f64>,
}

/// Train/test split result
#[derive(Debug, Clone)]
pub struct Split {
    pub train: TextDataset,
    pub test: TextDataset,
}

impl TextDataset {
    pub fn new(features: Vec<Vec<f64>>, labels: Vec<f64>) -> Self {
        assert_eq!(features.len(), labels.len());
        Self { features, labels }
    }

    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    pub fn n_features(&self) -> usize {
        self.features.first().map(|row| row.len()).unwrap_or(0)
    }

    /// Samples per class: (negatives, positives)
    pub fn class_counts(&self) -> (usize, usize) {
        let positives = self.labels.iter().filter(|&&y| y >= 0.5).count();
        (self.labels.len() - positives, positives)
    }

    /// Select rows by index
    pub fn subset(&self, indices: &[usize]) -> TextDataset {
        TextDataset {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Stratified train/test split
    ///
    /// Each class is shuffled and split independently so class proportions
    /// are preserved on both sides.
    pub fn stratified_split(&self, test_ratio: f64, seed: u64) -> Split {
        let (train_indices, test_indices) =
            stratified_split_indices(&self.labels, test_ratio, seed);

        Split {
            train: self.subset(&train_indices),
            test: self.subset(&test_indices),
        }
    }

    /// Bootstrap sample (random sample with replacement)
    pub fn bootstrap_sample(&self, seed: u64) -> TextDataset {
        use rand::Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = self.n_samples();
        let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

        self.subset(&indices)
    }
}

/// Balanced class weights: `n_samples / (n_classes * n_c)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassWeights {
    pub negative: f64,
    pub positive: f64,
}

impl ClassWeights {
    /// Uniform weights (every sample counts the same)
    pub fn uniform() -> Self {
        Self {
            negative: 1.0,
            positive: 1.0,
        }
    }

    /// Compute balanced weights from encoded labels
    pub fn balanced(labels: &[f64]) -> Self {
        let n = labels.len() as f64;
        let positives = labels.iter().filter(|&&y| y >= 0.5).count() as f64;
        let negatives = n - positives;

        Self {
            negative: if negatives > 0.0 { n / (2.0 * negatives) } else { 0.0 },
            positive: if positives > 0.0 { n / (2.0 * positives) } else { 0.0 },
        }
    }

    /// Weight for one sample's label
    pub fn weight(&self, label: f64) -> f64 {
        if label >= 0.5 {
            self.positive
        } else {
            self.negative
        }
    }
}

/// Stratified train/test index split over encoded labels
///
/// Per-class indices are shuffled with the seed; the test side takes
/// `round(test_ratio * n_c)` samples of each class. Both sides come back
/// sorted so downstream order is stable.
pub fn stratified_split_indices(
    labels: &[f64],
    test_ratio: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();

    for class in [0.0, 1.0] {
        let mut class_indices: Vec<usize> = (0..labels.len())
            .filter(|&i| (labels[i] >= 0.5) == (class >= 0.5))
            .collect();
        class_indices.shuffle(&mut rng);

        let test_size = (test_ratio * class_indices.len() as f64).round() as usize;
        test_indices.extend_from_slice(&class_indices[..test_size]);
        train_indices.extend_from_slice(&class_indices[test_size..]);
    }

    train_indices.sort_unstable();
    test_indices.sort_unstable();

    (train_indices, test_indices)
}

/// Stratified k-fold assignment
///
/// Returns `k` disjoint validation index sets covering all samples, each with
/// near-equal class proportions. Per-class indices are shuffled with the seed
/// and dealt round-robin into folds.
pub fn stratified_folds(labels: &[f64], k: usize, seed: u64) -> Vec<Vec<usize>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut folds: Vec<Vec<usize>> = vec![Vec::new(); k];

    for class in [0.0, 1.0] {
        let mut class_indices: Vec<usize> = (0..labels.len())
            .filter(|&i| (labels[i] >= 0.5) == (class >= 0.5))
            .collect();
        class_indices.shuffle(&mut rng);

        for (position, index) in class_indices.into_iter().enumerate() {
            folds[position % k].push(index);
        }
    }

    for fold in &mut folds {
        fold.sort_unstable();
    }

    folds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_dataset(n_per_class: usize) -> TextDataset {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..n_per_class {
            features.push(vec![i as f64, 0.0]);
            labels.push(0.0);
            features.push(vec![i as f64, 1.0]);
            labels.push(1.0);
        }
        TextDataset::new(features, labels)
    }

    #[test]
    fn test_stratified_split_preserves_ratio() {
        let dataset = toy_dataset(50);
        let split = dataset.stratified_split(0.2, 42);

        let (train_neg, train_pos) = split.train.class_counts();
        let (test_neg, test_pos) = split.test.class_counts();

        assert_eq!(train_neg, 40);
        assert_eq!(train_pos, 40);
        assert_eq!(test_neg, 10);
        assert_eq!(test_pos, 10);
    }

    #[test]
    fn test_split_is_seeded() {
        let dataset = toy_dataset(30);
        let a = dataset.stratified_split(0.2, 42);
        let b = dataset.stratified_split(0.2, 42);
        assert_eq!(a.test.labels, b.test.labels);
        assert_eq!(a.test.features, b.test.features);
    }

    #[test]
    fn test_balanced_class_weights() {
        // 3 negatives, 1 positive
        let weights = ClassWeights::balanced(&[0.0, 0.0, 0.0, 1.0]);
        assert!((weights.negative - 4.0 / 6.0).abs() < 1e-10);
        assert!((weights.positive - 2.0).abs() < 1e-10);

        // Balanced classes get uniform weights
        let weights = ClassWeights::balanced(&[0.0, 1.0, 0.0, 1.0]);
        assert!((weights.negative - 1.0).abs() < 1e-10);
        assert!((weights.positive - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_stratified_folds_cover_all_samples() {
        let labels: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 0.0 } else { 1.0 }).collect();
        let folds = stratified_folds(&labels, 4, 42);

        assert_eq!(folds.len(), 4);
        let mut all: Vec<usize> = folds.iter().flatten().copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..40).collect::<Vec<_>>());

        for fold in &folds {
            let positives = fold.iter().filter(|&&i| labels[i] >= 0.5).count();
            assert_eq!(positives, 5);
            assert_eq!(fold.len(), 10);
        }
    }

    #[test]
    fn test_bootstrap_sample_size() {
        let dataset = toy_dataset(20);
        let sample = dataset.bootstrap_sample(7);
        assert_eq!(sample.n_samples(), dataset.n_samples());
    }
}
