use crate::core::error::Result;
use crate::core::summary::Summary;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 摘要中的一个片段：源视频时间 + 摘要内时间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSegment {
    pub video_name: String,
    pub source_begin: u32,
    pub source_end: u32,
    pub summary_begin: u32,
    pub summary_end: u32,
    pub content: String,
}

/// What to cut from which video, in playback order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryPlan {
    pub dataset: String,
    pub segments: Vec<PlannedSegment>,
    pub total_duration_secs: u64,
}

impl SummaryPlan {
    pub fn from_summary(dataset: impl Into<String>, summary: &Summary) -> Self {
        let segments = summary
            .entries()
            .iter()
            .zip(summary.retimed())
            .map(|(source, retimed)| PlannedSegment {
                video_name: source.video_name.clone(),
                source_begin: source.begin,
                source_end: source.end,
                summary_begin: retimed.begin,
                summary_end: retimed.end,
                content: source.content.clone(),
            })
            .collect();

        Self {
            dataset: dataset.into(),
            segments,
            total_duration_secs: summary.duration_secs(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
