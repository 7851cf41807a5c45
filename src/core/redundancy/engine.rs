//! 跨视频冗余检测引擎

use super::cluster::{Cluster, ClusterBuilder};
use super::selector::{RepresentativeChoice, RepresentativeSelector};
use super::similarity::{MatchPair, SimilarityGraph};
use super::timeline::TimelineMerger;
use crate::core::config::ThresholdConfig;
use crate::core::error::{Result, SummaryError};
use crate::core::text::Vectorizer;
use crate::core::video::{SegmentKey, VideoSet};
use crate::core::visual::QualityScorer;
use log::info;

/// Result of one redundancy pass.
#[derive(Debug, Clone, Default)]
pub struct RedundancyOutcome {
    pub threshold: f64,
    pub matches: Vec<MatchPair>,
    pub choices: Vec<RepresentativeChoice>,
    /// Chosen representatives in timeline order.
    pub ordered: Vec<SegmentKey>,
    /// Clustered segments that were not chosen, sorted.
    pub discarded: Vec<SegmentKey>,
}

impl RedundancyOutcome {
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.choices.iter().map(|c| &c.cluster)
    }

    /// Every clustered segment, chosen or not, sorted.
    pub fn clustered(&self) -> Vec<SegmentKey> {
        let mut keys: Vec<SegmentKey> = self
            .clusters()
            .flat_map(|c| c.members.iter().copied())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

pub struct RedundancyEngine<'a> {
    vectorizer: &'a Vectorizer,
    graph: SimilarityGraph,
    scorer: &'a dyn QualityScorer,
}

impl<'a> RedundancyEngine<'a> {
    pub fn new(vectorizer: &'a Vectorizer, threshold: ThresholdConfig, scorer: &'a dyn QualityScorer) -> Self {
        Self {
            vectorizer,
            graph: SimilarityGraph::new(threshold),
            scorer,
        }
    }

    /// Detects redundancy without touching `videos`.
    pub fn analyze(&self, videos: &VideoSet) -> Result<RedundancyOutcome> {
        if videos.len() < 2 {
            return Err(SummaryError::NotEnoughVideos { found: videos.len() });
        }

        let matrix = self.vectorizer.vectorize(videos);
        let threshold = self.graph.threshold_for(videos.total_runtime_secs());
        info!(
            "🔍 Redundancy: {} segments, threshold {:.4} for {}s total",
            matrix.len(),
            threshold,
            videos.total_runtime_secs()
        );

        let matches = self.graph.best_matches(&matrix, threshold);
        let clusters = ClusterBuilder::from_matches(&matches);
        if clusters.is_empty() {
            info!("✓ No cross-video redundancy found");
            return Ok(RedundancyOutcome {
                threshold,
                matches,
                ..Default::default()
            });
        }

        let choices = RepresentativeSelector::new(self.scorer).select(videos, &clusters)?;
        let ordered = TimelineMerger::merge(&choices);
        let mut discarded: Vec<SegmentKey> = choices.iter().flat_map(|c| c.discarded()).collect();
        discarded.sort_unstable();

        info!(
            "✅ {} clusters, {} representatives kept, {} segments discarded",
            clusters.len(),
            ordered.len(),
            discarded.len()
        );

        Ok(RedundancyOutcome {
            threshold,
            matches,
            choices,
            ordered,
            discarded,
        })
    }
}
