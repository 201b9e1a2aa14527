//! Offline training binary
//!
//! Loads the labeled CSVs, trains the vectorizer and all five classifiers,
//! prints a per-model report and writes the JSON artifacts.

use anyhow::Result;
use clap::Parser;
use fake_news_ml::pipeline::{self, TrainConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "train",
    about = "Train the fake news classifiers and persist their artifacts"
)]
struct Args {
    /// Directory containing Fake.csv and True.csv
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory the trained artifacts are written to
    #[arg(long, default_value = "artifacts")]
    artifacts_dir: PathBuf,

    /// Held-out fraction for the test split
    #[arg(long, default_value_t = 0.18)]
    test_ratio: f64,

    /// Random seed for splits, sampling and feature subsets
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = TrainConfig {
        data_dir: args.data_dir,
        artifacts_dir: args.artifacts_dir,
        test_ratio: args.test_ratio,
        seed: args.seed,
        ..Default::default()
    };

    let report = pipeline::run(&config)?;
    println!("{}", report.display());

    Ok(())
}
