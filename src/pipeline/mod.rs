//! End-to-end training pipeline and artifact store
//!
//! Loads the labeled corpus, cleans it, fits the vectorizer and all five
//! classifiers, reports held-out metrics per model and persists everything
//! as JSON artifacts for the prediction service.

use crate::data::{stratified_split_indices, ClassWeights, Corpus, Label, TextDataset};
use crate::metrics::ClassificationMetrics;
use crate::models::{
    load_artifact, save_artifact, DecisionTree, ForestConfig, GbConfig, GradientBoosting,
    ModelError, MultinomialNb, NbGridSearch, RandomForest, StackingConfig, StackingEnsemble,
    TreeConfig,
};
use crate::nlp::{clean_text, TfidfConfig, TfidfVectorizer};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

const TFIDF_FILE: &str = "tfidf.json";
const NB_FILE: &str = "nb.json";
const DT_FILE: &str = "dt.json";
const RF_FILE: &str = "rf.json";
const GB_FILE: &str = "gb.json";
const STACK_FILE: &str = "stack.json";

/// Training pipeline configuration
///
/// Defaults carry the production hyperparameters; tests shrink them.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Directory holding `Fake.csv` and `True.csv`
    pub data_dir: PathBuf,
    /// Directory the artifacts are written to (created if absent)
    pub artifacts_dir: PathBuf,
    /// Held-out fraction for the test split
    pub test_ratio: f64,
    pub seed: u64,
    pub tfidf: TfidfConfig,
    pub tree: TreeConfig,
    pub forest: ForestConfig,
    pub boosting: GbConfig,
    /// Folds used for the stacking meta-features
    pub n_stacking_folds: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            artifacts_dir: PathBuf::from("artifacts"),
            test_ratio: 0.18,
            seed: 42,
            tfidf: TfidfConfig::default(),
            tree: TreeConfig::default(),
            forest: ForestConfig::default(),
            boosting: GbConfig::default(),
            n_stacking_folds: 5,
        }
    }
}

/// Held-out metrics for one model
#[derive(Debug, Clone)]
pub struct ModelReport {
    pub name: String,
    pub metrics: ClassificationMetrics,
}

/// Summary of one training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub n_train: usize,
    pub n_test: usize,
    pub vocabulary_size: usize,
    pub models: Vec<ModelReport>,
}

impl TrainingReport {
    /// Console-friendly summary of the whole run
    pub fn display(&self) -> String {
        let mut s = format!(
            "Training complete: {} train / {} test samples, {} terms\n",
            self.n_train, self.n_test, self.vocabulary_size
        );
        for model in &self.models {
            s.push_str(&format!("\n=== {} ===\n", model.name));
            s.push_str(&model.metrics.report());
        }
        s
    }
}

/// Per-model verdicts for one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelVerdicts {
    pub naive_bayes: &'static str,
    pub decision_tree: &'static str,
    pub random_forest: &'static str,
    pub gradient_boosting: &'static str,
    pub stacking: &'static str,
}

/// The complete set of persisted artifacts: the frozen vectorizer plus the
/// five trained classifiers
pub struct ArtifactSet {
    pub vectorizer: TfidfVectorizer,
    pub nb: MultinomialNb,
    pub tree: DecisionTree,
    pub forest: RandomForest,
    pub boosting: GradientBoosting,
    pub stacking: StackingEnsemble,
}

impl ArtifactSet {
    /// Persist all six artifacts as JSON files
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating artifacts directory {}", dir.display()))?;

        save_artifact(&self.vectorizer, &dir.join(TFIDF_FILE)).context("saving vectorizer")?;
        save_artifact(&self.nb, &dir.join(NB_FILE)).context("saving naive bayes")?;
        save_artifact(&self.tree, &dir.join(DT_FILE)).context("saving decision tree")?;
        save_artifact(&self.forest, &dir.join(RF_FILE)).context("saving random forest")?;
        save_artifact(&self.boosting, &dir.join(GB_FILE)).context("saving gradient boosting")?;
        save_artifact(&self.stacking, &dir.join(STACK_FILE)).context("saving stacking ensemble")?;

        info!(dir = %dir.display(), "artifacts saved");
        Ok(())
    }

    /// Load all six artifacts back from a directory
    pub fn load(dir: &Path) -> Result<Self> {
        let set = Self {
            vectorizer: load_artifact(&dir.join(TFIDF_FILE)).context("loading vectorizer")?,
            nb: load_artifact(&dir.join(NB_FILE)).context("loading naive bayes")?,
            tree: load_artifact(&dir.join(DT_FILE)).context("loading decision tree")?,
            forest: load_artifact(&dir.join(RF_FILE)).context("loading random forest")?,
            boosting: load_artifact(&dir.join(GB_FILE)).context("loading gradient boosting")?,
            stacking: load_artifact(&dir.join(STACK_FILE)).context("loading stacking ensemble")?,
        };

        info!(
            dir = %dir.display(),
            terms = set.vectorizer.n_terms(),
            "artifacts loaded"
        );
        Ok(set)
    }

    /// Clean raw text, vectorize it with the frozen vocabulary, and classify
    /// it with every model
    pub fn verdicts(&self, raw_text: &str) -> Result<ModelVerdicts, ModelError> {
        let cleaned = clean_text(raw_text);
        let features = self.vectorizer.transform(&cleaned);

        Ok(ModelVerdicts {
            naive_bayes: Label::decode(self.nb.predict_one(&features)?),
            decision_tree: Label::decode(self.tree.predict_one(&features)?),
            random_forest: Label::decode(self.forest.predict_one(&features)?),
            gradient_boosting: Label::decode(self.boosting.predict_one(&features)?),
            stacking: Label::decode(self.stacking.predict_one(&features)?),
        })
    }
}

/// Run the full training pipeline and persist the artifacts
pub fn run(config: &TrainConfig) -> Result<TrainingReport> {
    let corpus = Corpus::load(&config.data_dir).context("loading corpus")?;
    let labels = corpus.encoded_labels();

    info!(documents = corpus.n_documents(), "cleaning corpus");
    let cleaned: Vec<String> = corpus
        .documents
        .par_iter()
        .map(|doc| clean_text(doc))
        .collect();

    let (train_indices, test_indices) =
        stratified_split_indices(&labels, config.test_ratio, config.seed);

    let train_docs: Vec<String> = train_indices.iter().map(|&i| cleaned[i].clone()).collect();
    let train_labels: Vec<f64> = train_indices.iter().map(|&i| labels[i]).collect();
    let test_labels: Vec<f64> = test_indices.iter().map(|&i| labels[i]).collect();

    info!(
        train = train_docs.len(),
        test = test_indices.len(),
        "fitting vectorizer"
    );
    let mut vectorizer = TfidfVectorizer::new(config.tfidf.clone());
    let train_features = vectorizer.fit_transform(&train_docs);
    let test_features: Vec<Vec<f64>> = test_indices
        .par_iter()
        .map(|&i| vectorizer.transform(&cleaned[i]))
        .collect();
    info!(terms = vectorizer.n_terms(), "vocabulary frozen");

    let train = TextDataset::new(train_features, train_labels);
    let test = TextDataset::new(test_features, test_labels);

    let weights = ClassWeights::balanced(&train.labels);
    info!(
        negative = weights.negative,
        positive = weights.positive,
        "balanced class weights"
    );

    info!("running naive bayes grid search");
    let nb_outcome = NbGridSearch::default()
        .search(&train)
        .context("naive bayes grid search")?;

    let tree_config = TreeConfig {
        class_weights: weights,
        ..config.tree.clone()
    };
    info!("training decision tree");
    let mut tree = DecisionTree::new(tree_config.clone());
    tree.fit(&train.features, &train.labels)
        .context("training decision tree")?;

    let forest_config = ForestConfig {
        class_weights: weights,
        ..config.forest.clone()
    };
    info!("training random forest");
    let mut forest = RandomForest::new(forest_config.clone());
    forest
        .fit(&train.features, &train.labels)
        .context("training random forest")?;

    info!("training gradient boosting");
    let mut boosting = GradientBoosting::new(config.boosting);
    boosting
        .fit(&train.features, &train.labels)
        .context("training gradient boosting")?;

    info!("training stacking ensemble");
    let stack_config = StackingConfig {
        n_folds: config.n_stacking_folds,
        seed: config.seed,
        nb: *nb_outcome.best.config(),
        forest: forest_config,
        boosting: config.boosting,
        tree: tree_config,
        ..Default::default()
    };
    let mut stacking = StackingEnsemble::new(stack_config);
    stacking
        .fit(&train.features, &train.labels)
        .context("training stacking ensemble")?;

    let mut models = Vec::new();
    let mut evaluate = |name: &str, predictions: Vec<f64>| {
        let metrics = ClassificationMetrics::calculate(&test.labels, &predictions);
        info!(
            model = name,
            accuracy = metrics.accuracy,
            f1 = metrics.f1,
            macro_f1 = metrics.macro_f1,
            "held-out evaluation"
        );
        models.push(ModelReport {
            name: name.to_string(),
            metrics,
        });
    };

    evaluate("Naive Bayes", nb_outcome.best.predict(&test.features)?);
    evaluate("Decision Tree", tree.predict(&test.features)?);
    evaluate("Random Forest", forest.predict(&test.features)?);
    evaluate("Gradient Boosting", boosting.predict(&test.features)?);
    evaluate("Stacking Ensemble", stacking.predict(&test.features)?);

    let report = TrainingReport {
        n_train: train.n_samples(),
        n_test: test.n_samples(),
        vocabulary_size: vectorizer.n_terms(),
        models,
    };

    let artifacts = ArtifactSet {
        vectorizer,
        nb: nb_outcome.best,
        tree,
        forest,
        boosting,
        stacking,
    };
    artifacts
        .save(&config.artifacts_dir)
        .context("saving artifacts")?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_corpus(dir: &Path) {
        let fake_phrases = [
            "aliens secretly control the senate floor",
            "miracle pill cures every disease overnight",
            "celebrity clone spotted in hidden bunker",
            "moon base broadcasts mind control signals",
        ];
        let real_phrases = [
            "senate committee approves budget resolution today",
            "central bank holds interest rates steady",
            "voters head to polls in state election",
            "court upholds ruling on trade tariffs",
        ];

        let mut fake = std::fs::File::create(dir.join("Fake.csv")).unwrap();
        writeln!(fake, "title,text,subject,date").unwrap();
        for i in 0..24 {
            let phrase = fake_phrases[i % fake_phrases.len()];
            writeln!(fake, "Shocking report {i},{phrase} number {i},News,2017-01-01").unwrap();
        }

        let mut real = std::fs::File::create(dir.join("True.csv")).unwrap();
        writeln!(real, "title,text,subject,date").unwrap();
        for i in 0..24 {
            let phrase = real_phrases[i % real_phrases.len()];
            writeln!(real, "Daily briefing {i},{phrase} number {i},politicsNews,2017-01-01")
                .unwrap();
        }
    }

    fn small_config(data_dir: PathBuf, artifacts_dir: PathBuf) -> TrainConfig {
        TrainConfig {
            data_dir,
            artifacts_dir,
            tfidf: TfidfConfig {
                max_features: 300,
                min_df: 1,
                ngram_max: 2,
            },
            tree: TreeConfig {
                max_depth: 6,
                ..Default::default()
            },
            forest: ForestConfig {
                n_trees: 10,
                max_depth: 5,
                ..Default::default()
            },
            boosting: GbConfig {
                n_estimators: 10,
                ..Default::default()
            },
            n_stacking_folds: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_run_trains_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let artifacts_dir = dir.path().join("artifacts");

        let config = small_config(dir.path().to_path_buf(), artifacts_dir.clone());
        let report = run(&config).unwrap();

        assert_eq!(report.models.len(), 5);
        assert!(report.vocabulary_size > 0);
        assert!(report.n_test > 0);
        for model in &report.models {
            assert!(model.metrics.accuracy > 0.7, "{} underperformed", model.name);
        }

        for file in [TFIDF_FILE, NB_FILE, DT_FILE, RF_FILE, GB_FILE, STACK_FILE] {
            assert!(artifacts_dir.join(file).exists(), "missing {file}");
        }
    }

    #[test]
    fn test_loaded_artifacts_give_deterministic_verdicts() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let artifacts_dir = dir.path().join("artifacts");

        let config = small_config(dir.path().to_path_buf(), artifacts_dir.clone());
        run(&config).unwrap();

        let artifacts = ArtifactSet::load(&artifacts_dir).unwrap();
        let text = "Senate committee approves the budget resolution";
        let first = artifacts.verdicts(text).unwrap();
        let second = artifacts.verdicts(text).unwrap();

        assert_eq!(first, second);
        for verdict in [
            first.naive_bayes,
            first.decision_tree,
            first.random_forest,
            first.gradient_boosting,
            first.stacking,
        ] {
            assert!(verdict == "REAL" || verdict == "FAKE");
        }
    }

    #[test]
    fn test_missing_data_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            data_dir: dir.path().join("nope"),
            artifacts_dir: dir.path().join("artifacts"),
            ..Default::default()
        };
        assert!(run(&config).is_err());
    }

    #[test]
    fn test_report_display_lists_models() {
        let metrics = ClassificationMetrics::calculate(&[1.0, 0.0], &[1.0, 0.0]);
        let report = TrainingReport {
            n_train: 2,
            n_test: 2,
            vocabulary_size: 10,
            models: vec![ModelReport {
                name: "Naive Bayes".to_string(),
                metrics,
            }],
        };

        let text = report.display();
        assert!(text.contains("Naive Bayes"));
        assert!(text.contains("Accuracy"));
    }
}
