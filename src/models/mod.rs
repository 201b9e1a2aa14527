//! Classifier implementations and artifact persistence
//!
//! All models operate on dense TF-IDF feature rows, expose
//! `fit` / `predict_one` / `predict`, and serialize with serde so the
//! training pipeline can persist them and the server can load them back.

mod decision_tree;
mod gradient_boosting;
mod logistic;
mod naive_bayes;
mod random_forest;
mod stacking;

pub use decision_tree::{DecisionTree, TaskType, TreeConfig};
pub use gradient_boosting::{GbConfig, GradientBoosting};
pub use logistic::{LogisticConfig, LogisticRegression};
pub use naive_bayes::{MultinomialNb, NbConfig, NbGridSearch, NbSearchOutcome};
pub use random_forest::{ForestConfig, RandomForest};
pub use stacking::{StackingConfig, StackingEnsemble};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

/// Errors shared by all models
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model not trained")]
    NotTrained,

    #[error("Dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Training failed: {0}")]
    TrainingFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Persist a fitted model (or the vectorizer) as a JSON artifact
pub fn save_artifact<T: Serialize>(value: &T, path: &Path) -> Result<(), ModelError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, value).map_err(|e| ModelError::Serialization(e.to_string()))
}

/// Load a persisted artifact back
pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| ModelError::Serialization(e.to_string()))
}
