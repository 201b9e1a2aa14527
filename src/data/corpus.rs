//! Labeled news corpus loaded from CSV files
//!
//! The training data ships as two CSVs with `title` and `text` columns:
//! `Fake.csv` (label FAKE) and `True.csv` (label REAL). Title and body are
//! concatenated into one document per article.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Article class label
///
/// Encoding is alphabetical over the label names: FAKE = 0, REAL = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Fake,
    Real,
}

impl Label {
    /// Numeric encoding used by the models
    pub fn encode(self) -> f64 {
        match self {
            Label::Fake => 0.0,
            Label::Real => 1.0,
        }
    }

    /// Decode a model prediction back to its label name
    pub fn decode(value: f64) -> &'static str {
        if value >= 0.5 {
            "REAL"
        } else {
            "FAKE"
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Fake => "FAKE",
            Label::Real => "REAL",
        }
    }
}

/// One row of the input CSVs; extra columns are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct NewsRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

impl NewsRecord {
    /// Title and body concatenated with a single space, as the models see it
    pub fn combined(&self) -> String {
        format!("{} {}", self.title, self.text).trim().to_string()
    }
}

/// A labeled collection of raw article texts
#[derive(Debug, Clone)]
pub struct Corpus {
    pub documents: Vec<String>,
    pub labels: Vec<Label>,
}

impl Corpus {
    pub fn n_documents(&self) -> usize {
        self.documents.len()
    }

    /// Load the standard two-file layout from a data directory:
    /// `Fake.csv` labeled FAKE and `True.csv` labeled REAL.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut corpus = Self {
            documents: Vec::new(),
            labels: Vec::new(),
        };

        corpus.load_csv(&data_dir.join("Fake.csv"), Label::Fake)?;
        corpus.load_csv(&data_dir.join("True.csv"), Label::Real)?;

        info!(
            total = corpus.n_documents(),
            fake = corpus.labels.iter().filter(|l| **l == Label::Fake).count(),
            real = corpus.labels.iter().filter(|l| **l == Label::Real).count(),
            "corpus loaded"
        );

        Ok(corpus)
    }

    /// Append one CSV file of articles under a fixed label
    pub fn load_csv(&mut self, path: &Path, label: Label) -> Result<()> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        for result in reader.deserialize() {
            let record: NewsRecord =
                result.with_context(|| format!("malformed row in {}", path.display()))?;
            self.documents.push(record.combined());
            self.labels.push(label);
        }

        Ok(())
    }

    /// Labels as the numeric encoding the models train on
    pub fn encoded_labels(&self) -> Vec<f64> {
        self.labels.iter().map(|l| l.encode()).collect()
    }
}
