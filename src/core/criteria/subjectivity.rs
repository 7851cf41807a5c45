//! 主观性过滤

use super::SelectionCriterion;
use crate::core::error::{Result, SummaryError};
use crate::core::summary::SummaryContext;
use crate::core::video::SegmentKey;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[-./?!,":;()']"#).expect("separator pattern is valid"));

pub trait SubjectivityClassifier: Send + Sync {
    fn is_subjective(&self, text: &str) -> Result<bool>;

    /// False when the classifier has nothing to decide with.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Precomputed document sentiment for a transcript text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sentiment {
    pub magnitude: f32,
    /// Score of each sentence, in `[-1, 1]`.
    pub sentence_scores: Vec<f32>,
}

/// Adjective counts from a SentiLex-style lexicon, combined with sentiment
/// magnitudes when the host supplies them.
#[derive(Debug, Clone, Default)]
pub struct LexiconSubjectivityClassifier {
    adjectives: FxHashSet<String>,
    sentiments: FxHashMap<String, Sentiment>,
}

impl LexiconSubjectivityClassifier {
    /// Lines look like `lemma,...PoS=Adj;...`; only adjectives are kept.
    pub fn from_sentilex_str(lexicon: &str) -> Self {
        let adjectives = lexicon
            .lines()
            .filter(|line| line.contains("PoS=Adj"))
            .filter_map(|line| line.split(',').next())
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        Self {
            adjectives,
            sentiments: FxHashMap::default(),
        }
    }

    pub fn from_sentilex_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SummaryError::Lexicon(format!("{}: {}", path.display(), e)))?;
        let classifier = Self::from_sentilex_str(&raw);
        info!(
            "📖 Loaded {} adjectives from {}",
            classifier.adjectives.len(),
            path.display()
        );
        Ok(classifier)
    }

    pub fn with_sentiment(mut self, text: impl Into<String>, sentiment: Sentiment) -> Self {
        self.sentiments.insert(text.into(), sentiment);
        self
    }

    pub fn adjective_count(&self) -> usize {
        self.adjectives.len()
    }

    fn decide(words: usize, adjectives: usize, sentiment: Option<&Sentiment>) -> bool {
        let magnitude = sentiment.map_or(0.0, |s| s.magnitude);
        match words {
            0..=35 => magnitude > 0.6 || adjectives >= 3,
            36..=70 => magnitude > 1.2 || adjectives >= 4,
            _ => {
                let strong_sentences = sentiment.is_some_and(|s| {
                    !s.sentence_scores.is_empty()
                        && s.sentence_scores.iter().filter(|v| v.abs() > 0.3).count() as f32
                            >= s.sentence_scores.len() as f32 * 0.4
                });
                adjectives >= 4 || strong_sentences
            }
        }
    }
}

impl SubjectivityClassifier for LexiconSubjectivityClassifier {
    fn is_subjective(&self, text: &str) -> Result<bool> {
        let cleaned = SEPARATORS.replace_all(text, " ").to_lowercase();
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        let adjectives = tokens
            .iter()
            .filter(|t| self.adjectives.contains(**t))
            .count();
        Ok(Self::decide(tokens.len(), adjectives, self.sentiments.get(text)))
    }

    fn is_ready(&self) -> bool {
        !self.adjectives.is_empty() || !self.sentiments.is_empty()
    }
}

pub struct MockSubjectivityClassifier {
    pattern: Option<Box<dyn Fn(&str) -> bool + Send + Sync>>,
}

impl MockSubjectivityClassifier {
    /// Never subjective.
    pub fn new() -> Self {
        Self { pattern: None }
    }

    pub fn with_pattern<F>(pattern: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            pattern: Some(Box::new(pattern)),
        }
    }
}

impl Default for MockSubjectivityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SubjectivityClassifier for MockSubjectivityClassifier {
    fn is_subjective(&self, text: &str) -> Result<bool> {
        Ok(self.pattern.as_ref().map(|p| p(text)).unwrap_or(false))
    }
}

pub struct Subjectivity<'a> {
    classifier: &'a dyn SubjectivityClassifier,
}

impl<'a> Subjectivity<'a> {
    pub fn new(classifier: &'a dyn SubjectivityClassifier) -> Self {
        Self { classifier }
    }

    fn remove_where(&self, mut ctx: SummaryContext, subjective: bool) -> Result<SummaryContext> {
        if !self.classifier.is_ready() {
            warn!("⚠️ Subjectivity classifier has no lexicon or sentiments, step skipped");
            return Ok(ctx);
        }
        let mut keys = Vec::new();
        for (v, video) in ctx.videos.videos().iter().enumerate() {
            for (s, segment) in video.segments().iter().enumerate() {
                if self.classifier.is_subjective(&segment.content)? == subjective {
                    keys.push(SegmentKey::new(v, s));
                }
            }
        }
        let removed = ctx.delete(&keys)?;
        info!(
            "🧹 Removed {} {} segments",
            removed.len(),
            if subjective { "subjective" } else { "objective" }
        );
        Ok(ctx)
    }
}

impl SelectionCriterion for Subjectivity<'_> {
    /// Keeps only subjective segments.
    fn include(&self, ctx: SummaryContext) -> Result<SummaryContext> {
        self.remove_where(ctx, false)
    }

    fn exclude(&self, ctx: SummaryContext) -> Result<SummaryContext> {
        self.remove_where(ctx, true)
    }
}
