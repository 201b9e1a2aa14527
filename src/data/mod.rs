//! Data loading and dataset handling
//!
//! - `corpus` - Labeled news articles loaded from CSV files
//! - `dataset` - Dense feature datasets, stratified splits and class weights

mod corpus;
mod dataset;

pub use corpus::{Corpus, Label, NewsRecord};
pub use dataset::{
    stratified_folds, stratified_split_indices, ClassWeights, Split, TextDataset,
};
