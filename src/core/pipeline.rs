//! 摘要流水线：按顺序执行选择准则

use crate::core::criteria::{Collaborators, Criterion, Mode};
use crate::core::error::{Result, SummaryError};
use crate::core::summary::SummaryContext;
use crate::core::video::VideoSet;
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    steps: Vec<(Criterion, Mode)>,
}

impl Default for Pipeline {
    /// Keep the shortest introduction, drop subjective talk, keep one
    /// segment per repeated topic.
    fn default() -> Self {
        Self {
            steps: vec![
                (Criterion::Introduction, Mode::Include),
                (Criterion::Subjectivity, Mode::Exclude),
                (Criterion::Redundancy, Mode::Include),
            ],
        }
    }
}

impl Pipeline {
    pub fn new(steps: Vec<(Criterion, Mode)>) -> Self {
        Self { steps }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn then(mut self, criterion: Criterion, mode: Mode) -> Self {
        self.steps.push((criterion, mode));
        self
    }

    pub fn steps(&self) -> &[(Criterion, Mode)] {
        &self.steps
    }

    /// Runs every step in order on a dedicated worker pool.
    pub fn run(&self, videos: VideoSet, with: &Collaborators) -> Result<SummaryContext> {
        if videos.len() < 2 {
            return Err(SummaryError::NotEnoughVideos { found: videos.len() });
        }

        let pool = with.config.build_thread_pool()?;
        let start = Instant::now();
        let ctx = pool.install(|| {
            self.steps
                .iter()
                .try_fold(SummaryContext::new(videos), |ctx, &(criterion, mode)| {
                    info!("▶️ {} ({:?})", criterion, mode);
                    criterion.apply(mode, ctx, with)
                })
        })?;

        info!(
            "🏁 Summary ready: {} segments, {}s, in {:?}",
            ctx.summary.len(),
            ctx.summary.duration_secs(),
            start.elapsed()
        );
        Ok(ctx)
    }
}
