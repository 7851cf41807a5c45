use serde::{Deserialize, Serialize};
use std::fmt;

/// `(video index, segment index)` identity of a segment within one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentKey {
    pub video: usize,
    pub segment: usize,
}

impl SegmentKey {
    pub fn new(video: usize, segment: usize) -> Self {
        Self { video, segment }
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.video, self.segment)
    }
}

/// 视频片段：时间区间 + 字幕文本
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Index of the owning video in its `VideoSet`.
    pub video: usize,
    pub begin: u32,
    pub end: u32,
    pub content: String,
}

impl Segment {
    pub fn new(video: usize, begin: u32, end: u32, content: impl Into<String>) -> Self {
        Self {
            video,
            begin,
            end,
            content: content.into(),
        }
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.begin)
    }

    /// Seconds covered by the segment, end exclusive.
    pub fn seconds(&self) -> std::ops::Range<u32> {
        self.begin..self.end
    }
}
