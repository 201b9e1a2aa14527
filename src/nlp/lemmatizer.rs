//! Rule-based English lemmatization
//!
//! Reduces noun plurals to their singular dictionary form ("studies" ->
//! "study", "children" -> "child"). Matches the behavior of dictionary
//! lemmatizers run with the default noun part-of-speech: verb inflections
//! like "running" are left untouched.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Irregular plurals and invariant words that the suffix rules would mangle
static EXCEPTIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // Invariants
        ("news", "news"),
        ("series", "series"),
        ("species", "species"),
        ("politics", "politics"),
        ("economics", "economics"),
        ("physics", "physics"),
        ("mathematics", "mathematics"),
        ("headquarters", "headquarters"),
        ("people", "people"),
        ("media", "media"),
        ("data", "data"),
        // Irregular plurals
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("leaves", "leaf"),
        ("halves", "half"),
        ("selves", "self"),
    ])
});

/// Lemmatize a single lowercase token
///
/// Idempotent: applying the rules to their own output changes nothing, which
/// keeps the full cleaning pipeline idempotent.
pub fn lemmatize(word: &str) -> String {
    if let Some(&lemma) = EXCEPTIONS.get(word) {
        return lemma.to_string();
    }

    let n = word.len();
    if n < 4 || !word.ends_with('s') {
        return word.to_string();
    }

    // "classes" -> "class", "presses" -> "press"
    if word.ends_with("sses") {
        return word[..n - 2].to_string();
    }

    // "studies" -> "study", but "ties" -> "tie" via the generic rule below
    if word.ends_with("ies") && n > 4 {
        return format!("{}y", &word[..n - 3]);
    }

    // "boxes" -> "box", "churches" -> "church", "heroes" -> "hero"
    for suffix in ["xes", "ches", "shes", "zes", "oes"] {
        if word.ends_with(suffix) {
            return word[..n - 2].to_string();
        }
    }

    // Plain plural "s", protecting "ss"/"us"/"is" endings ("press", "virus",
    // "analysis")
    if !word.ends_with("ss") && !word.ends_with("us") && !word.ends_with("is") {
        return word[..n - 1].to_string();
    }

    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        assert_eq!(lemmatize("articles"), "article");
        assert_eq!(lemmatize("reports"), "report");
        assert_eq!(lemmatize("sources"), "source");
    }

    #[test]
    fn test_ies_plurals() {
        assert_eq!(lemmatize("studies"), "study");
        assert_eq!(lemmatize("cities"), "city");
        assert_eq!(lemmatize("agencies"), "agency");
    }

    #[test]
    fn test_es_plurals() {
        assert_eq!(lemmatize("boxes"), "box");
        assert_eq!(lemmatize("churches"), "church");
        assert_eq!(lemmatize("classes"), "class");
    }

    #[test]
    fn test_protected_endings() {
        assert_eq!(lemmatize("press"), "press");
        assert_eq!(lemmatize("virus"), "virus");
        assert_eq!(lemmatize("analysis"), "analysis");
        assert_eq!(lemmatize("crisis"), "crisis");
    }

    #[test]
    fn test_irregulars_and_invariants() {
        assert_eq!(lemmatize("news"), "news");
        assert_eq!(lemmatize("children"), "child");
        assert_eq!(lemmatize("women"), "woman");
        assert_eq!(lemmatize("people"), "people");
    }

    #[test]
    fn test_short_words_untouched() {
        assert_eq!(lemmatize("gas"), "gas");
        assert_eq!(lemmatize("us"), "us");
        assert_eq!(lemmatize("s"), "s");
    }

    #[test]
    fn test_verb_forms_untouched() {
        assert_eq!(lemmatize("running"), "running");
        assert_eq!(lemmatize("reported"), "reported");
    }

    #[test]
    fn test_fixpoint() {
        for word in [
            "articles", "studies", "boxes", "classes", "children", "news", "heroes", "lives",
        ] {
            let once = lemmatize(word);
            assert_eq!(lemmatize(&once), once, "not a fixpoint: {word}");
        }
    }
}
