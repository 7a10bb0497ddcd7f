//! Leaf classification: proper-noun place or feature reference.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::models::Leaf;

lazy_static! {
    static ref CONJUNCTION_REGEX: Regex = Regex::new(r"(?i)\s*(?:,|&|\band\b|\bor\b)\s*").unwrap();
}

const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "an", "the", "all", "any", "some", "every", "each", "few", "many", "most", "several",
    "no", "and", "or", "of", "in", "at", "on", "near", "within", "to", "from", "by", "with",
];

const DEFAULT_FEATURE_TERMS: &[&str] = &[
    "airport", "atm", "bakery", "bank", "bar", "beach", "bridge", "building", "cafe", "church",
    "cinema", "clinic", "coffee", "college", "gas", "grocery", "gym", "home", "hospital", "hostel",
    "hotel", "house", "lake", "library", "mall", "market", "mosque", "motel", "museum", "office",
    "park", "parking", "pharmacy", "pizza", "playground", "pub", "restaurant", "river", "road",
    "school", "shop", "stadium", "station", "store", "street", "supermarket", "temple", "theater",
    "theatre", "trail", "university",
];

/// Labels a span of text as a [`Leaf`].
///
/// Implementations must be pure; the grammar calls them for every leaf span
/// and for every candidate split of a juxtaposed phrase.
pub trait EntityClassifier: Send + Sync {
    fn classify(&self, span: &str) -> Leaf;
}

/// Capitalization heuristic.
///
/// A span whose every token starts with an uppercase letter and is not a
/// stopword is a [`Leaf::NamedPlace`]. A lone token found in the feature
/// lexicon (singular or plural) is always a [`Leaf::Place`], so a
/// sentence-initial "Shops" stays a feature.
#[derive(Debug, Clone)]
pub struct CapitalizationClassifier {
    stopwords: HashSet<String>,
    feature_terms: HashSet<String>,
}

impl CapitalizationClassifier {
    pub fn new() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            feature_terms: DEFAULT_FEATURE_TERMS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn with_feature_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.feature_terms
            .extend(terms.into_iter().map(|t| t.as_ref().to_lowercase()));
        self
    }

    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    pub fn is_named(&self, span: &str) -> bool {
        let tokens = tokens(span);
        if tokens.is_empty() {
            return false;
        }
        if tokens.len() == 1 && self.is_feature_term(tokens[0]) {
            return false;
        }
        tokens.iter().all(|token| {
            token.chars().next().is_some_and(char::is_uppercase)
                && !self.stopwords.contains(&token.to_lowercase())
        })
    }

    fn is_feature_term(&self, token: &str) -> bool {
        let lower = token.to_lowercase();
        if self.feature_terms.contains(&lower) {
            return true;
        }
        if let Some(stem) = lower.strip_suffix("ies") {
            if self.feature_terms.contains(&format!("{stem}y")) {
                return true;
            }
        }
        lower
            .strip_suffix("es")
            .is_some_and(|stem| self.feature_terms.contains(stem))
            || lower
                .strip_suffix('s')
                .is_some_and(|stem| self.feature_terms.contains(stem))
    }
}

impl Default for CapitalizationClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityClassifier for CapitalizationClassifier {
    fn classify(&self, span: &str) -> Leaf {
        let span = clean_span(span);
        if self.is_named(span) {
            return Leaf::NamedPlace {
                terms: vec![span.to_string()],
            };
        }

        let terms: Vec<String> = CONJUNCTION_REGEX
            .split(span)
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(capitalize)
            .collect();
        if terms.is_empty() {
            return Leaf::Place {
                terms: vec![capitalize(span)],
            };
        }
        Leaf::Place { terms }
    }
}

fn tokens(span: &str) -> Vec<&str> {
    span.unicode_words().collect()
}

/// Trim whitespace and trailing sentence punctuation.
pub(crate) fn clean_span(span: &str) -> &str {
    span.trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '?' | '!' | ',' | ';' | ':'))
        .trim()
}

fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
