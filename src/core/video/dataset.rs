//! 数据集加载：字幕 JSON + 帧目录

use super::frame_store::DirectoryFrameStore;
use super::segment::Segment;
use super::video::{Video, VideoSet};
use crate::core::error::{Result, SummaryError};
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub path: PathBuf,
    pub videos: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptEntry {
    begin: String,
    end: String,
    #[serde(default)]
    content: String,
}

impl Dataset {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, videos: Vec<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            videos,
        }
    }

    /// `<path>/<video>/<video>.json`
    pub fn transcript_path(&self, video: &str) -> PathBuf {
        self.path.join(video).join(format!("{}.json", video))
    }

    /// Redundancy is only defined across videos, so fewer than two is a
    /// configuration error.
    pub fn validate(&self) -> Result<()> {
        if self.videos.len() < 2 {
            return Err(SummaryError::NotEnoughVideos {
                found: self.videos.len(),
            });
        }
        Ok(())
    }
}

pub struct DatasetLoader {
    dataset: Dataset,
    frames: DirectoryFrameStore,
}

impl DatasetLoader {
    pub fn new(dataset: Dataset, frames_root: impl Into<PathBuf>) -> Result<Self> {
        dataset.validate()?;
        Ok(Self {
            dataset,
            frames: DirectoryFrameStore::new(frames_root),
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn frame_store(&self) -> &DirectoryFrameStore {
        &self.frames
    }

    /// Loads every transcript and checks every frame directory up front.
    pub fn load_videos(&self) -> Result<VideoSet> {
        info!(
            "📂 Loading dataset '{}' ({} videos) from {:?}",
            self.dataset.name,
            self.dataset.videos.len(),
            self.dataset.path
        );

        let mut videos = Vec::with_capacity(self.dataset.videos.len());
        for (index, name) in self.dataset.videos.iter().enumerate() {
            self.frames.ensure_video(name)?;
            let segments = load_transcript(&self.dataset.transcript_path(name), index)?;
            info!("✓ '{}': {} segments", name, segments.len());
            videos.push(Video::new(name.clone(), segments));
        }
        Ok(VideoSet::new(videos))
    }
}

pub fn load_transcript(path: &Path, video: usize) -> Result<Vec<Segment>> {
    let raw = std::fs::read_to_string(path).map_err(|e| SummaryError::Transcript {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let entries: Vec<TranscriptEntry> =
        serde_json::from_str(&raw).map_err(|e| SummaryError::Transcript {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    entries
        .into_iter()
        .map(|entry| {
            Ok(Segment::new(
                video,
                seconds_from_time(&entry.begin)?,
                seconds_from_time(&entry.end)?,
                entry.content,
            ))
        })
        .collect()
}

/// `HH:MM:SS` → seconds, hours within a single day.
pub fn seconds_from_time(time: &str) -> Result<u32> {
    let invalid = || SummaryError::InvalidTimestamp(time.to_string());
    let parts: Vec<&str> = time.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }
    let mut fields = [0u32; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| invalid())?;
    }
    let [hours, minutes, seconds] = fields;
    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }
    Ok(hours * 3600 + minutes * 60 + seconds)
}
