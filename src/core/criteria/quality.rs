use super::SelectionCriterion;
use crate::core::error::Result;
use crate::core::summary::SummaryContext;
use crate::core::video::SegmentKey;
use crate::core::visual::QualityScorer;
use log::{debug, info};

/// 每个视频中视觉质量最高的片段
pub struct Quality<'a> {
    scorer: &'a dyn QualityScorer,
}

impl<'a> Quality<'a> {
    pub fn new(scorer: &'a dyn QualityScorer) -> Self {
        Self { scorer }
    }

    /// Best segment of every non-empty video, in video order. Each video is
    /// scored on its own; ties go to the earliest segment.
    pub fn best_segments(&self, ctx: &SummaryContext) -> Result<Vec<SegmentKey>> {
        let mut best = Vec::new();
        for (v, video) in ctx.videos.videos().iter().enumerate() {
            if video.is_empty() {
                continue;
            }
            let keys: Vec<SegmentKey> = (0..video.len()).map(|s| SegmentKey::new(v, s)).collect();
            let scores = self.scorer.score_segments(&ctx.videos, &keys)?;

            let mut chosen = (keys[0], f64::NEG_INFINITY);
            for key in &keys {
                let score = scores.get(key).copied().unwrap_or(0.0);
                if score > chosen.1 {
                    chosen = (*key, score);
                }
            }
            debug!("🏅 '{}': best segment {} (score {:.3})", video.name, chosen.0, chosen.1);
            best.push(chosen.0);
        }
        Ok(best)
    }
}

impl SelectionCriterion for Quality<'_> {
    fn include(&self, mut ctx: SummaryContext) -> Result<SummaryContext> {
        let best = self.best_segments(&ctx)?;
        ctx.append(&best)?;
        info!("📌 Added {} best-quality segments", best.len());
        Ok(ctx)
    }

    fn exclude(&self, mut ctx: SummaryContext) -> Result<SummaryContext> {
        let best = self.best_segments(&ctx)?;
        ctx.delete(&best)?;
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::video::{Segment, Video, VideoSet};
    use crate::core::visual::StaticQualityScorer;

    fn context() -> SummaryContext {
        SummaryContext::new(VideoSet::new(vec![
            Video::new(
                "a",
                vec![Segment::new(0, 0, 4, "x"), Segment::new(0, 4, 8, "y")],
            ),
            Video::new("empty", vec![]),
            Video::new("c", vec![Segment::new(2, 0, 4, "z"), Segment::new(2, 4, 8, "w")]),
        ]))
    }

    #[test]
    fn test_best_segments_per_video() {
        let scorer = StaticQualityScorer::new().with_score(SegmentKey::new(0, 1), 3.0);
        let best = Quality::new(&scorer).best_segments(&context()).unwrap();
        assert_eq!(best, vec![SegmentKey::new(0, 1), SegmentKey::new(2, 0)]);
    }

    #[test]
    fn test_include_and_exclude() {
        let scorer = StaticQualityScorer::new().with_score(SegmentKey::new(2, 1), 1.0);
        let criterion = Quality::new(&scorer);

        let included = criterion.include(context()).unwrap();
        let names: Vec<&str> = included.summary.entries().iter().map(|e| e.content.as_str()).collect();
        assert_eq!(names, vec!["x", "w"]);

        let excluded = criterion.exclude(context()).unwrap();
        assert_eq!(excluded.videos.video(0).unwrap().segments()[0].content, "y");
        assert_eq!(excluded.videos.video(2).unwrap().segments()[0].content, "z");
    }
}
