//! 选择准则
//!
//! Every criterion can either add matching segments to the summary
//! (`include`) or drop them from their videos (`exclude`). The set of
//! criteria is closed; `Criterion::apply` dispatches statically.

pub mod introduction;
pub mod quality;
pub mod redundancy;
pub mod subjectivity;

pub use introduction::Introduction;
pub use quality::Quality;
pub use redundancy::Redundancy;
pub use subjectivity::{
    LexiconSubjectivityClassifier, MockSubjectivityClassifier, Sentiment, Subjectivity,
    SubjectivityClassifier,
};

use crate::core::config::SummarizerConfig;
use crate::core::error::Result;
use crate::core::redundancy::RedundancyEngine;
use crate::core::summary::SummaryContext;
use crate::core::text::Vectorizer;
use crate::core::video::FrameStore;
use crate::core::visual::QualityScorer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub trait SelectionCriterion {
    fn include(&self, ctx: SummaryContext) -> Result<SummaryContext>;
    fn exclude(&self, ctx: SummaryContext) -> Result<SummaryContext>;

    fn apply(&self, mode: Mode, ctx: SummaryContext) -> Result<SummaryContext> {
        match mode {
            Mode::Include => self.include(ctx),
            Mode::Exclude => self.exclude(ctx),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Introduction,
    Subjectivity,
    Redundancy,
    Quality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Include,
    Exclude,
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Criterion::Introduction => "introduction",
            Criterion::Subjectivity => "subjectivity",
            Criterion::Redundancy => "redundancy",
            Criterion::Quality => "quality",
        };
        f.write_str(name)
    }
}

/// External services the criteria rely on.
pub struct Collaborators {
    pub config: SummarizerConfig,
    pub frames: Arc<dyn FrameStore>,
    pub quality: Arc<dyn QualityScorer>,
    pub subjectivity: Arc<dyn SubjectivityClassifier>,
    pub vectorizer: Vectorizer,
}

impl Collaborators {
    pub fn new(
        config: SummarizerConfig,
        frames: Arc<dyn FrameStore>,
        quality: Arc<dyn QualityScorer>,
        subjectivity: Arc<dyn SubjectivityClassifier>,
    ) -> Result<Self> {
        config.validate()?;
        let vectorizer = Vectorizer::new(&config.language)?;
        Ok(Self {
            config,
            frames,
            quality,
            subjectivity,
            vectorizer,
        })
    }
}

impl Criterion {
    pub fn apply(self, mode: Mode, ctx: SummaryContext, with: &Collaborators) -> Result<SummaryContext> {
        match self {
            Criterion::Introduction => {
                Introduction::new(with.frames.as_ref(), with.config.introduction_threshold)
                    .apply(mode, ctx)
            }
            Criterion::Subjectivity => Subjectivity::new(with.subjectivity.as_ref()).apply(mode, ctx),
            Criterion::Redundancy => Redundancy::new(RedundancyEngine::new(
                &with.vectorizer,
                with.config.threshold,
                with.quality.as_ref(),
            ))
            .apply(mode, ctx),
            Criterion::Quality => Quality::new(with.quality.as_ref()).apply(mode, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criterion_serde_names() {
        let json = serde_json::to_string(&(Criterion::Redundancy, Mode::Include)).unwrap();
        assert_eq!(json, r#"["redundancy","include"]"#);
        let back: (Criterion, Mode) = serde_json::from_str(r#"["introduction","exclude"]"#).unwrap();
        assert_eq!(back, (Criterion::Introduction, Mode::Exclude));
        assert_eq!(Criterion::Quality.to_string(), "quality");
    }
}
