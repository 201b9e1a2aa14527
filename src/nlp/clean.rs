//! Text cleaning for training and serving
//!
//! The cleaning function is the single entry point used by both the training
//! pipeline and the prediction service. The two sides must transform text
//! identically, otherwise the frozen vocabulary no longer matches the
//! features seen at inference time.

use super::lemmatizer::lemmatize;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\S+|www\.\S+").unwrap());
static HTML_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+").unwrap());
static NON_ALPHA_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").unwrap());
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static STOPWORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORD_LIST.iter().copied().collect());

/// English stopwords, restricted to alphabetic forms since cleaning removes
/// all non-letter characters before tokenization (so "don't" arrives as
/// "don" + "t").
const STOPWORD_LIST: &[&str] = &[
    // Articles and determiners
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "either", "neither",
    "both", "few", "more", "most", "other", "some", "such", "any", "all", "own", "same",
    // Pronouns
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom",
    // Verbs
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "would", "should", "could", "ought", "might", "must", "shall",
    "will", "can", "may",
    // Prepositions and conjunctions
    "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "nor", "so", "than", "too", "very",
    // Adverbs and misc
    "here", "there", "when", "where", "why", "how", "no", "not", "only", "just", "now",
    // Contraction fragments left over after punctuation removal
    "s", "t", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "couldn", "didn", "doesn",
    "don", "hadn", "hasn", "haven", "isn", "mightn", "mustn", "needn", "shan", "shouldn",
    "wasn", "weren", "won", "wouldn",
];

/// Whether a token is an English stopword
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Clean a raw article into the normalized form the models are trained on
///
/// Steps: lowercase, strip URLs/HTML tags/emails, drop non-letters, collapse
/// whitespace, tokenize, remove stopwords, lemmatize, re-join with single
/// spaces. The output contains only lowercase ASCII letters and single
/// spaces, and cleaning an already-cleaned string changes nothing.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();

    let no_urls = URL_REGEX.replace_all(&lowered, "");
    let no_html = HTML_REGEX.replace_all(&no_urls, "");
    let no_emails = EMAIL_REGEX.replace_all(&no_html, "");
    let letters_only = NON_ALPHA_REGEX.replace_all(&no_emails, " ");
    let collapsed = WHITESPACE_REGEX.replace_all(&letters_only, " ");

    let tokens: Vec<String> = collapsed
        .trim()
        .split_whitespace()
        .filter(|w| !is_stopword(w))
        .map(lemmatize)
        // A lemma can land on a stopword ("cans" -> "can"); filtering again
        // keeps the function idempotent.
        .filter(|w| !is_stopword(w))
        .collect();

    tokens.join(" ")
}
