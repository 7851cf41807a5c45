//! 片段视觉质量评分（BoVW）

use super::descriptor::{Descriptor, DescriptorExtractor};
use super::keyframe::KeyframeFilter;
use super::vocabulary::{inverse_document_frequency, VisualVocabulary};
use crate::core::config::{VisualConfig, VocabularyFallback};
use crate::core::error::{Result, SummaryError};
use crate::core::video::{FrameStore, SegmentKey, VideoSet};
use log::{debug, info, warn};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

pub type QualityScores = BTreeMap<SegmentKey, f64>;

/// Visual-distinctiveness score per segment. Higher is better; the same
/// frames always give the same scores.
pub trait QualityScorer: Send + Sync {
    /// Scores every key in one invocation, so all keys share one model.
    fn score_segments(&self, videos: &VideoSet, keys: &[SegmentKey]) -> Result<QualityScores>;
}

pub struct BovwQualityScorer {
    frames: Arc<dyn FrameStore>,
    config: VisualConfig,
    extractor: DescriptorExtractor,
}

impl BovwQualityScorer {
    pub fn new(frames: Arc<dyn FrameStore>, config: VisualConfig) -> Self {
        let extractor = DescriptorExtractor::new(&config);
        Self {
            frames,
            config,
            extractor,
        }
    }

    /// Descriptors of the keyframes of one segment.
    pub fn segment_descriptors(&self, videos: &VideoSet, key: SegmentKey) -> Result<Vec<Descriptor>> {
        let segment = videos.segment(key)?;
        let name = &videos.video(key.video)?.name;
        let frames = self.frames.load_segment_frames(name, segment.seconds())?;

        let mut filter = KeyframeFilter::with_threshold(self.config.keyframe_diff_threshold);
        Ok(filter
            .keyframes(&frames)
            .into_iter()
            .flat_map(|frame| self.extractor.extract(frame))
            .collect())
    }

    fn fit_vocabulary(&self, descriptors: &[Descriptor]) -> Result<Option<VisualVocabulary>> {
        let k = self.config.vocabulary_size;
        match VisualVocabulary::fit(descriptors, k, self.config.kmeans_iterations, self.config.seed) {
            Ok(vocabulary) => Ok(Some(vocabulary)),
            Err(SummaryError::VocabularyFit { requested, available }) => match self.config.fallback {
                VocabularyFallback::Shrink if available > 0 => {
                    warn!(
                        "⚠️ Visual vocabulary shrunk from {} to {} words",
                        requested, available
                    );
                    VisualVocabulary::fit(
                        descriptors,
                        available,
                        self.config.kmeans_iterations,
                        self.config.seed,
                    )
                    .map(Some)
                }
                VocabularyFallback::Shrink => {
                    warn!("⚠️ No visual descriptors, all quality scores are 0");
                    Ok(None)
                }
                VocabularyFallback::LowestKey => {
                    warn!(
                        "⚠️ Visual vocabulary fit failed ({} of {} words), falling back to lowest key",
                        available, requested
                    );
                    Ok(None)
                }
            },
            Err(e) => Err(e),
        }
    }
}

impl QualityScorer for BovwQualityScorer {
    fn score_segments(&self, videos: &VideoSet, keys: &[SegmentKey]) -> Result<QualityScores> {
        let per_segment: Vec<(SegmentKey, Vec<Descriptor>)> = keys
            .par_iter()
            .map(|&key| Ok((key, self.segment_descriptors(videos, key)?)))
            .collect::<Result<_>>()?;

        let all: Vec<Descriptor> = per_segment
            .iter()
            .flat_map(|(_, ds)| ds.iter().copied())
            .collect();
        debug!(
            "🖼️ {} descriptors from {} segments",
            all.len(),
            per_segment.len()
        );

        let Some(vocabulary) = self.fit_vocabulary(&all)? else {
            return Ok(keys.iter().map(|&k| (k, 0.0)).collect());
        };

        let histograms: Vec<Vec<u32>> = per_segment
            .iter()
            .map(|(_, ds)| vocabulary.histogram(ds))
            .collect();
        let idf = inverse_document_frequency(&histograms, vocabulary.size());

        let scores: QualityScores = per_segment
            .iter()
            .zip(&histograms)
            .map(|((key, _), histogram)| {
                let score = histogram
                    .iter()
                    .zip(&idf)
                    .map(|(&tf, w)| tf as f64 * w)
                    .sum();
                (*key, score)
            })
            .collect();

        info!(
            "✅ Scored {} segments over {} visual words",
            scores.len(),
            vocabulary.size()
        );
        Ok(scores)
    }
}

/// Fixed scores supplied by the host; unknown keys score 0.
#[derive(Debug, Clone, Default)]
pub struct StaticQualityScorer {
    scores: FxHashMap<SegmentKey, f64>,
}

impl StaticQualityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(mut self, key: SegmentKey, score: f64) -> Self {
        self.scores.insert(key, score);
        self
    }
}

impl QualityScorer for StaticQualityScorer {
    fn score_segments(&self, _videos: &VideoSet, keys: &[SegmentKey]) -> Result<QualityScores> {
        Ok(keys
            .iter()
            .map(|k| (*k, self.scores.get(k).copied().unwrap_or(0.0)))
            .collect())
    }
}
