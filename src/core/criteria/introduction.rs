use super::SelectionCriterion;
use crate::core::error::Result;
use crate::core::summary::SummaryContext;
use crate::core::video::{FrameStore, SegmentKey};
use crate::core::visual::frame_similarity;
use log::{debug, info};

/// 片头检测：相邻帧直方图交集骤降处即片头结束
pub struct Introduction<'a> {
    frames: &'a dyn FrameStore,
    threshold: f32,
}

impl<'a> Introduction<'a> {
    pub fn new(frames: &'a dyn FrameStore, threshold: f32) -> Self {
        Self { frames, threshold }
    }

    /// Second of the first frame whose successor differs from it by more
    /// than the threshold; the last frame's second when none does.
    pub fn end_second(&self, video: &str) -> Result<u32> {
        let frames = self.frames.load_frames(video, true)?;
        for pair in frames.windows(2) {
            if frame_similarity(&pair[0], &pair[1]) < self.threshold {
                return Ok(pair[0].video_second);
            }
        }
        Ok(frames.last().map_or(0, |f| f.video_second))
    }

    /// Number of leading introduction segments per video.
    fn introduction_lengths(&self, ctx: &SummaryContext) -> Result<Vec<(u32, usize)>> {
        ctx.videos
            .videos()
            .iter()
            .map(|video| {
                let end = self.end_second(&video.name)?;
                let count = video.leading_segments_before(end);
                debug!("🎬 '{}': introduction ends at {}s ({} segments)", video.name, end, count);
                Ok((end, count))
            })
            .collect()
    }

    fn remove(ctx: &mut SummaryContext, lengths: &[(u32, usize)]) -> Result<()> {
        let keys: Vec<SegmentKey> = lengths
            .iter()
            .enumerate()
            .flat_map(|(v, &(_, count))| (0..count).map(move |s| SegmentKey::new(v, s)))
            .collect();
        let removed = ctx.delete(&keys)?;
        info!("✂️ Removed {} introduction segments", removed.len());
        Ok(())
    }
}

impl SelectionCriterion for Introduction<'_> {
    /// Appends the shortest introduction to the summary, then removes every
    /// video's introduction.
    fn include(&self, mut ctx: SummaryContext) -> Result<SummaryContext> {
        let lengths = self.introduction_lengths(&ctx)?;

        let shortest = lengths
            .iter()
            .enumerate()
            .min_by_key(|(_, (end, _))| *end)
            .map(|(v, &(_, count))| (v, count));
        if let Some((video, count)) = shortest {
            let keys: Vec<SegmentKey> = (0..count).map(|s| SegmentKey::new(video, s)).collect();
            ctx.append(&keys)?;
            info!("📌 Introduction of video {} added ({} segments)", video, count);
        }

        Self::remove(&mut ctx, &lengths)?;
        Ok(ctx)
    }

    fn exclude(&self, mut ctx: SummaryContext) -> Result<SummaryContext> {
        let lengths = self.introduction_lengths(&ctx)?;
        Self::remove(&mut ctx, &lengths)?;
        Ok(ctx)
    }
}
