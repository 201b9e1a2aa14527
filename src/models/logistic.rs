//! Logistic regression trained with batch gradient descent
//!
//! Small dense model used as the combiner on top of the base classifiers'
//! probability outputs.

use super::ModelError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Logistic regression hyperparameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LogisticConfig {
    pub learning_rate: f64,
    /// Gradient descent iteration cap
    pub max_iter: usize,
    /// Stop when the gradient norm drops below this
    pub tolerance: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iter: 1200,
            tolerance: 1e-6,
        }
    }
}

/// Binary logistic regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    config: LogisticConfig,
    weights: Option<Array1<f64>>,
    bias: f64,
}

impl LogisticRegression {
    pub fn new(config: LogisticConfig) -> Self {
        Self {
            config,
            weights: None,
            bias: 0.0,
        }
    }

    pub fn config(&self) -> &LogisticConfig {
        &self.config
    }

    /// Train with full-batch gradient descent
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 || n_samples != y.len() {
            return Err(ModelError::TrainingFailed(
                "empty dataset or feature/label length mismatch".to_string(),
            ));
        }

        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0;
        let n = n_samples as f64;

        for _ in 0..self.config.max_iter {
            let logits = x.dot(&weights) + bias;
            let probs = logits.mapv(sigmoid);
            let errors = &probs - y;

            let grad_w = x.t().dot(&errors) / n;
            let grad_b = errors.sum() / n;

            weights.scaled_add(-self.config.learning_rate, &grad_w);
            bias -= self.config.learning_rate * grad_b;

            let grad_norm = grad_w.dot(&grad_w).sqrt() + grad_b.abs();
            if grad_norm < self.config.tolerance {
                break;
            }
        }

        self.weights = Some(weights);
        self.bias = bias;
        Ok(())
    }

    /// Positive-class probability for one sample
    pub fn predict_proba_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        let weights = self.weights.as_ref().ok_or(ModelError::NotTrained)?;
        if features.len() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                got: features.len(),
            });
        }

        let z: f64 = weights
            .iter()
            .zip(features.iter())
            .map(|(w, f)| w * f)
            .sum::<f64>()
            + self.bias;
        Ok(sigmoid(z))
    }

    /// Predicted class (0.0 or 1.0) for one sample
    pub fn predict_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        let proba = self.predict_proba_one(features)?;
        Ok(if proba >= 0.5 { 1.0 } else { 0.0 })
    }

    /// Predict a batch of samples
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<f64>, ModelError> {
        x.rows()
            .into_iter()
            .map(|row| {
                let features: Vec<f64> = row.to_vec();
                self.predict_one(&features)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [0.0, 0.1],
            [0.2, 0.0],
            [0.1, 0.2],
            [0.3, 0.1],
            [0.9, 1.0],
            [1.0, 0.8],
            [0.8, 0.9],
            [1.0, 1.0],
        ];
        let y = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn test_learns_linearly_separable() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new(LogisticConfig {
            learning_rate: 0.5,
            max_iter: 5000,
            ..Default::default()
        });
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        assert_eq!(predictions, y.to_vec());
    }

    #[test]
    fn test_probability_ordering() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new(LogisticConfig::default());
        model.fit(&x, &y).unwrap();

        let low = model.predict_proba_one(&[0.0, 0.0]).unwrap();
        let high = model.predict_proba_one(&[1.0, 1.0]).unwrap();
        assert!(high > low);
    }

    #[test]
    fn test_untrained_errors() {
        let model = LogisticRegression::new(LogisticConfig::default());
        assert!(matches!(
            model.predict_one(&[0.5, 0.5]),
            Err(ModelError::NotTrained)
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new(LogisticConfig::default());
        model.fit(&x, &y).unwrap();

        assert!(matches!(
            model.predict_one(&[0.5]),
            Err(ModelError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_sigmoid_bounds() {
        assert!(sigmoid(-100.0) < 1e-10);
        assert!(sigmoid(100.0) > 1.0 - 1e-10);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }
}
