//! 帧访问：按秒读取视频帧

use super::frame::Frame;
use crate::core::error::{Result, SummaryError};
use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Access to the per-second frames of each video.
pub trait FrameStore: Send + Sync {
    /// All frames of a video, optionally sorted by second.
    fn load_frames(&self, video: &str, sorted: bool) -> Result<Vec<Frame>>;

    /// Frames whose second falls in `seconds`, sorted by second.
    fn load_segment_frames(&self, video: &str, seconds: Range<u32>) -> Result<Vec<Frame>> {
        let mut frames: Vec<Frame> = self
            .load_frames(video, false)?
            .into_iter()
            .filter(|f| seconds.contains(&f.video_second))
            .collect();
        frames.sort_by_key(|f| f.video_second);
        Ok(frames)
    }
}

/// `<root>/<video>/image-<second>.jpg`
#[derive(Debug, Clone)]
pub struct DirectoryFrameStore {
    root: PathBuf,
}

impl DirectoryFrameStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn video_dir(&self, video: &str) -> PathBuf {
        self.root.join(video)
    }

    /// Fails when the frame directory of `video` does not exist.
    pub fn ensure_video(&self, video: &str) -> Result<()> {
        let dir = self.video_dir(video);
        if dir.is_dir() {
            Ok(())
        } else {
            Err(SummaryError::MissingFrames(dir))
        }
    }

    /// 并行解码，保持输入顺序
    fn decode(paths: &[(u32, PathBuf)]) -> Result<Vec<Frame>> {
        paths.par_iter().map(|(_, p)| Frame::open(p)).collect()
    }

    fn frame_paths(&self, video: &str) -> Result<Vec<(u32, PathBuf)>> {
        self.ensure_video(video)?;
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(self.video_dir(video))? {
            let path = entry?.path();
            if let Some(second) = Frame::second_from_path(&path) {
                paths.push((second, path));
            }
        }
        Ok(paths)
    }
}

impl FrameStore for DirectoryFrameStore {
    fn load_frames(&self, video: &str, sorted: bool) -> Result<Vec<Frame>> {
        let mut paths = self.frame_paths(video)?;
        if sorted {
            paths.sort_by_key(|(second, _)| *second);
        }
        debug!("🖼️ Loading {} frames for '{}'", paths.len(), video);
        Self::decode(&paths)
    }

    fn load_segment_frames(&self, video: &str, seconds: Range<u32>) -> Result<Vec<Frame>> {
        // 只解码区间内的帧
        let mut paths: Vec<(u32, PathBuf)> = self
            .frame_paths(video)?
            .into_iter()
            .filter(|(second, _)| seconds.contains(second))
            .collect();
        paths.sort_by_key(|(second, _)| *second);
        Self::decode(&paths)
    }
}

/// Frames supplied directly by the host.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFrameStore {
    frames: FxHashMap<String, Vec<Frame>>,
}

impl InMemoryFrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, video: impl Into<String>, frames: Vec<Frame>) {
        self.frames.insert(video.into(), frames);
    }

    pub fn with_video(mut self, video: impl Into<String>, frames: Vec<Frame>) -> Self {
        self.insert(video, frames);
        self
    }
}

impl FrameStore for InMemoryFrameStore {
    fn load_frames(&self, video: &str, sorted: bool) -> Result<Vec<Frame>> {
        let mut frames = self
            .frames
            .get(video)
            .cloned()
            .ok_or_else(|| SummaryError::MissingFrames(PathBuf::from(video)))?;
        if sorted {
            frames.sort_by_key(|f| f.video_second);
        }
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(second: u32) -> Frame {
        Frame::new(4, 4, vec![second as u8; 16], second)
    }

    #[test]
    fn test_memory_store_sorting_and_range() {
        let store = InMemoryFrameStore::new().with_video("a", vec![frame(3), frame(0), frame(1), frame(2)]);

        let sorted = store.load_frames("a", true).unwrap();
        let seconds: Vec<u32> = sorted.iter().map(|f| f.video_second).collect();
        assert_eq!(seconds, vec![0, 1, 2, 3]);

        let window = store.load_segment_frames("a", 1..3).unwrap();
        let seconds: Vec<u32> = window.iter().map(|f| f.video_second).collect();
        assert_eq!(seconds, vec![1, 2]);
    }

    #[test]
    fn test_directory_store_decodes_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("v");
        std::fs::create_dir_all(&video).unwrap();
        for s in 0..12u32 {
            image::GrayImage::from_pixel(8, 8, image::Luma([(s * 20) as u8]))
                .save(video.join(format!("image-{}.jpg", s)))
                .unwrap();
        }
        std::fs::write(video.join("notes.txt"), "x").unwrap();

        let store = DirectoryFrameStore::new(dir.path());
        let frames = store.load_frames("v", true).unwrap();
        let seconds: Vec<u32> = frames.iter().map(|f| f.video_second).collect();
        assert_eq!(seconds, (0..12).collect::<Vec<_>>());
        for f in &frames {
            let expected = (f.video_second * 20) as i32;
            assert!((f.data[0] as i32 - expected).abs() <= 4);
        }

        let window = store.load_segment_frames("v", 3..6).unwrap();
        let seconds: Vec<u32> = window.iter().map(|f| f.video_second).collect();
        assert_eq!(seconds, vec![3, 4, 5]);
    }

    #[test]
    fn test_missing_video() {
        let store = InMemoryFrameStore::new();
        assert!(matches!(
            store.load_frames("nope", false),
            Err(SummaryError::MissingFrames(_))
        ));

        let dir = DirectoryFrameStore::new("/definitely/not/here");
        assert!(matches!(
            dir.ensure_video("v"),
            Err(SummaryError::MissingFrames(_))
        ));
    }
}
