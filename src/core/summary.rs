//! 摘要结果与流水线上下文

use crate::core::error::Result;
use crate::core::video::{Segment, SegmentKey, VideoSet};
use serde::{Deserialize, Serialize};

/// One segment copied into the summary, with its source timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub video: usize,
    pub video_name: String,
    pub begin: u32,
    pub end: u32,
    pub content: String,
}

impl SummaryEntry {
    pub fn from_segment(video_name: impl Into<String>, segment: &Segment) -> Self {
        Self {
            video: segment.video,
            video_name: video_name.into(),
            begin: segment.begin,
            end: segment.end,
            content: segment.content.clone(),
        }
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.begin)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    entries: Vec<SummaryEntry>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: SummaryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duration_secs(&self) -> u64 {
        self.entries.iter().map(|e| e.duration() as u64).sum()
    }

    /// Entries laid end to end from second 0, keeping each duration.
    pub fn retimed(&self) -> Vec<SummaryEntry> {
        let mut begin = 0u32;
        self.entries
            .iter()
            .map(|entry| {
                let end = begin + entry.duration();
                let retimed = SummaryEntry {
                    begin,
                    end,
                    ..entry.clone()
                };
                begin = end;
                retimed
            })
            .collect()
    }
}

/// State threaded by value through the selection criteria.
#[derive(Debug, Clone, Default)]
pub struct SummaryContext {
    pub videos: VideoSet,
    pub summary: Summary,
}

impl SummaryContext {
    pub fn new(videos: VideoSet) -> Self {
        Self {
            videos,
            summary: Summary::new(),
        }
    }

    /// Copies the given segments, in order, to the end of the summary.
    pub fn append(&mut self, keys: &[SegmentKey]) -> Result<()> {
        for key in keys {
            let segment = self.videos.segment(*key)?;
            let name = &self.videos.video(key.video)?.name;
            self.summary.push(SummaryEntry::from_segment(name.clone(), segment));
        }
        Ok(())
    }

    pub fn delete(&mut self, keys: &[SegmentKey]) -> Result<Vec<Segment>> {
        self.videos.delete_keys(keys)
    }
}
