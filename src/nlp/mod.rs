//! Natural language processing for news articles
//!
//! Includes:
//! - Text cleaning (URL/HTML/email stripping, stopword removal)
//! - Rule-based English lemmatization
//! - TF-IDF vectorization with unigrams and bigrams

mod clean;
mod lemmatizer;
mod vectorizer;

pub use clean::{clean_text, is_stopword};
pub use lemmatizer::lemmatize;
pub use vectorizer::{TfidfConfig, TfidfVectorizer};
