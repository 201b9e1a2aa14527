//! TF-IDF vectorization
//!
//! Builds a frozen vocabulary of unigrams and bigrams from cleaned training
//! text and turns documents into L2-normalized TF-IDF feature vectors. The
//! vocabulary is fit once during training, serialized alongside the models,
//! and reused unchanged at inference time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Vectorizer hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfConfig {
    /// Vocabulary cap; the most frequent terms are kept
    pub max_features: usize,
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
    /// Largest n-gram size (1 = unigrams only, 2 = unigrams + bigrams)
    pub ngram_max: usize,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            max_features: 15_000,
            min_df: 3,
            ngram_max: 2,
        }
    }
}

/// TF-IDF vectorizer with a frozen vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: TfidfConfig,
    /// Term -> feature index
    vocabulary: HashMap<String, usize>,
    /// Feature index -> term
    terms: Vec<String>,
    /// Smoothed inverse document frequency per term
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new(config: TfidfConfig) -> Self {
        Self {
            config,
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            idf: Vec::new(),
        }
    }

    /// Number of terms in the fitted vocabulary
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// The fitted vocabulary
    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Extract unigram and n-gram terms from a cleaned document
    ///
    /// Bigrams are joined with `_` so they live in the same string vocabulary
    /// as unigrams.
    pub fn extract_terms(&self, document: &str) -> Vec<String> {
        let words: Vec<&str> = document.split_whitespace().collect();
        let mut terms: Vec<String> = words.iter().map(|w| w.to_string()).collect();

        for n in 2..=self.config.ngram_max {
            for window in words.windows(n) {
                terms.push(window.join("_"));
            }
        }

        terms
    }

    /// Fit the vocabulary and IDF weights on cleaned training documents
    pub fn fit(&mut self, documents: &[String]) {
        let n_docs = documents.len();

        // Document frequency and collection frequency per term
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut total_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = self.extract_terms(doc);
            let unique: std::collections::HashSet<&String> = terms.iter().collect();
            for term in &unique {
                *doc_freq.entry((*term).clone()).or_insert(0) += 1;
            }
            for term in &terms {
                *total_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        // Keep terms above min_df, ranked by collection frequency with
        // lexicographic tie-breaking so the vocabulary is deterministic
        let mut candidates: Vec<(String, usize)> = doc_freq
            .iter()
            .filter(|(_, &df)| df >= self.config.min_df)
            .map(|(term, _)| (term.clone(), total_freq[term]))
            .collect();

        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        candidates.truncate(self.config.max_features);

        // Index terms alphabetically so feature order is stable regardless of
        // frequency ranking
        let mut kept: Vec<String> = candidates.into_iter().map(|(t, _)| t).collect();
        kept.sort();

        self.vocabulary.clear();
        self.terms.clear();
        for (idx, term) in kept.into_iter().enumerate() {
            self.vocabulary.insert(term.clone(), idx);
            self.terms.push(term);
        }

        // Smoothed IDF: ln((1 + n) / (1 + df)) + 1
        self.idf = vec![0.0; self.terms.len()];
        for (term, &idx) in &self.vocabulary {
            let df = doc_freq[term] as f64;
            self.idf[idx] = ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0;
        }
    }

    /// Transform a cleaned document into an L2-normalized TF-IDF vector
    ///
    /// Terms outside the frozen vocabulary are ignored.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.terms.len()];

        for term in self.extract_terms(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                vector[idx] += 1.0;
            }
        }

        for (idx, value) in vector.iter_mut().enumerate() {
            *value *= self.idf[idx];
        }

        l2_normalize(&mut vector);
        vector
    }

    /// Fit on the documents, then transform each of them
    pub fn fit_transform(&mut self, documents: &[String]) -> Vec<Vec<f64>> {
        self.fit(documents);
        documents.iter().map(|doc| self.transform(doc)).collect()
    }
}

/// In-place L2 normalization
fn l2_normalize(vector: &mut [f64]) {
    let norm: f64 = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_docs() -> Vec<String> {
        vec![
            "president signed new bill today".to_string(),
            "president spoke about new bill".to_string(),
            "aliens landed behind white house".to_string(),
            "president bill veto news today".to_string(),
        ]
    }

    #[test]
    fn test_fit_builds_vocabulary() {
        let mut tfidf = TfidfVectorizer::new(TfidfConfig {
            max_features: 100,
            min_df: 2,
            ngram_max: 1,
        });
        tfidf.fit(&sample_docs());

        assert!(tfidf.vocabulary().contains_key("president"));
        assert!(tfidf.vocabulary().contains_key("bill"));
        // "aliens" appears in one document, below min_df
        assert!(!tfidf.vocabulary().contains_key("aliens"));
    }

    #[test]
    fn test_bigrams_extracted() {
        let tfidf = TfidfVectorizer::new(TfidfConfig::default());
        let terms = tfidf.extract_terms("fake news spreads fast");

        assert!(terms.contains(&"fake".to_string()));
        assert!(terms.contains(&"fake_news".to_string()));
        assert!(terms.contains(&"spreads_fast".to_string()));
    }

    #[test]
    fn test_max_features_cap() {
        let mut tfidf = TfidfVectorizer::new(TfidfConfig {
            max_features: 3,
            min_df: 1,
            ngram_max: 1,
        });
        tfidf.fit(&sample_docs());
        assert_eq!(tfidf.n_terms(), 3);
    }

    #[test]
    fn test_transform_l2_normalized() {
        let mut tfidf = TfidfVectorizer::new(TfidfConfig {
            max_features: 100,
            min_df: 1,
            ngram_max: 2,
        });
        tfidf.fit(&sample_docs());

        let vector = tfidf.transform("president signed new bill");
        let norm: f64 = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_transform_ignores_unknown_terms() {
        let mut tfidf = TfidfVectorizer::new(TfidfConfig {
            max_features: 100,
            min_df: 1,
            ngram_max: 1,
        });
        tfidf.fit(&sample_docs());
        let vocab_before = tfidf.vocabulary().len();

        let vector = tfidf.transform("entirely unseen words here");
        assert!(vector.iter().all(|&v| v == 0.0));
        assert_eq!(tfidf.vocabulary().len(), vocab_before);
    }

    #[test]
    fn test_transform_deterministic() {
        let mut tfidf = TfidfVectorizer::new(TfidfConfig::default());
        tfidf.fit(&sample_docs());

        let a = tfidf.transform("president signed bill");
        let b = tfidf.transform("president signed bill");
        assert_eq!(a, b);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut tfidf = TfidfVectorizer::new(TfidfConfig {
            max_features: 50,
            min_df: 1,
            ngram_max: 2,
        });
        tfidf.fit(&sample_docs());

        let json = serde_json::to_string(&tfidf).unwrap();
        let restored: TfidfVectorizer = serde_json::from_str(&json).unwrap();

        let doc = "president spoke today";
        assert_eq!(tfidf.transform(doc), restored.transform(doc));
    }
}
