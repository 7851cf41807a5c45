//! Transcript preprocessing: punctuation/digit stripping, stop-word removal, stemming.

use crate::core::error::{Result, SummaryError};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{P}").expect("punctuation pattern is valid"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("digit pattern is valid"));

pub struct TextPreprocessor {
    stopwords: FxHashSet<String>,
    stemmer: Stemmer,
}

impl TextPreprocessor {
    /// Supported: portuguese, english, spanish, french, german, italian.
    pub fn new(language: &str) -> Result<Self> {
        let (lang, algorithm) = match language.to_lowercase().as_str() {
            "pt" | "portuguese" => (LANGUAGE::Portuguese, Algorithm::Portuguese),
            "en" | "english" => (LANGUAGE::English, Algorithm::English),
            "es" | "spanish" => (LANGUAGE::Spanish, Algorithm::Spanish),
            "fr" | "french" => (LANGUAGE::French, Algorithm::French),
            "de" | "german" => (LANGUAGE::German, Algorithm::German),
            "it" | "italian" => (LANGUAGE::Italian, Algorithm::Italian),
            other => {
                return Err(SummaryError::Config(format!(
                    "unsupported transcript language '{}'",
                    other
                )))
            }
        };

        let stopwords = get(lang).iter().map(|s| s.to_lowercase()).collect();
        Ok(Self {
            stopwords,
            stemmer: Stemmer::create(algorithm),
        })
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Processed tokens of `text`, in order; empty when nothing survives.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let without_punct = PUNCTUATION.replace_all(text, "");
        let cleaned = DIGITS.replace_all(&without_punct, "");

        cleaned
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|w| !self.stopwords.contains(w))
            .map(|w| self.stemmer.stem(&w).into_owned())
            .filter(|w| !w.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portuguese_stopwords_removed() {
        let pre = TextPreprocessor::new("portuguese").unwrap();
        assert!(pre.is_stopword("o"));
        assert!(pre.is_stopword("De"));
        assert!(!pre.is_stopword("gato"));

        let tokens = pre.tokens("o gato correu rápido");
        assert_eq!(tokens.len(), 3);
        assert!(!tokens.iter().any(|t| t == "o"));
    }

    #[test]
    fn test_punctuation_and_digits_stripped() {
        let pre = TextPreprocessor::new("pt").unwrap();
        assert!(pre.tokens("123, 456! ... ?").is_empty());
        assert_eq!(pre.tokens("gato!"), pre.tokens("gato"));
        assert_eq!(pre.tokens("gato2"), pre.tokens("gato"));
    }

    #[test]
    fn test_stemming_merges_inflections() {
        let pre = TextPreprocessor::new("portuguese").unwrap();
        assert_eq!(pre.tokens("gatos"), pre.tokens("gato"));
    }

    #[test]
    fn test_unknown_language() {
        assert!(matches!(
            TextPreprocessor::new("klingon"),
            Err(SummaryError::Config(_))
        ));
    }
}
