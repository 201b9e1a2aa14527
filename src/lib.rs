//! # Fake News ML - News Article Classification
//!
//! This library trains a TF-IDF vectorizer and five classifiers
//! (Naive Bayes, Decision Tree, Random Forest, Gradient Boosting and a
//! stacking ensemble) on labeled news articles, and serves predictions
//! over HTTP from the persisted artifacts.
//!
//! ## Modules
//!
//! - `nlp` - Text cleaning, lemmatization and TF-IDF vectorization
//! - `data` - Corpus loading, labeled datasets and stratified splits
//! - `models` - Classifier implementations and artifact persistence
//! - `metrics` - Binary classification metrics
//! - `pipeline` - The end-to-end training pipeline
//! - `server` - The HTTP prediction service

pub mod data;
pub mod metrics;
pub mod models;
pub mod nlp;
pub mod pipeline;
pub mod server;

pub use data::{Corpus, Label, TextDataset};
pub use models::{
    DecisionTree, GradientBoosting, LogisticRegression, MultinomialNb, RandomForest,
    StackingEnsemble,
};
pub use nlp::{clean_text, TfidfVectorizer};
pub use pipeline::{ArtifactSet, TrainConfig, TrainingReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::data::{ClassWeights, Corpus, Label, Split, TextDataset};
    pub use crate::metrics::ClassificationMetrics;
    pub use crate::models::{
        DecisionTree, ForestConfig, GbConfig, GradientBoosting, LogisticRegression, MultinomialNb,
        RandomForest, StackingEnsemble, TreeConfig,
    };
    pub use crate::nlp::{clean_text, TfidfConfig, TfidfVectorizer};
    pub use crate::pipeline::{ArtifactSet, TrainConfig, TrainingReport};
}
