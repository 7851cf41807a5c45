use super::segment::{Segment, SegmentKey};
use crate::core::error::{Result, SummaryError};

#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub name: String,
    segments: Vec<Segment>,
}

impl Video {
    pub fn new(name: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            name: name.into(),
            segments,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End second of the last segment, 0 for an empty video.
    pub fn runtime_secs(&self) -> u32 {
        self.segments.last().map(|s| s.end).unwrap_or(0)
    }

    /// Leading segments that start before `end_second`.
    pub fn leading_segments_before(&self, end_second: u32) -> usize {
        self.segments
            .iter()
            .take_while(|s| s.begin < end_second)
            .count()
    }

    /// Removes the given indices. Indices are resolved against the current
    /// layout, so they are deleted from highest to lowest.
    pub fn delete_segments(&mut self, indices: &[usize]) -> Vec<Segment> {
        let mut sorted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.segments.len())
            .collect();
        sorted.sort_unstable();
        sorted.dedup();

        let mut removed = Vec::with_capacity(sorted.len());
        for index in sorted.into_iter().rev() {
            removed.push(self.segments.remove(index));
        }
        removed.reverse();
        removed
    }
}

/// 输入视频集合，拥有所有片段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoSet {
    videos: Vec<Video>,
}

impl VideoSet {
    /// Builds a set and rewrites each segment's back-reference to its video position.
    pub fn new(mut videos: Vec<Video>) -> Self {
        for (index, video) in videos.iter_mut().enumerate() {
            for segment in video.segments.iter_mut() {
                segment.video = index;
            }
        }
        Self { videos }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn video(&self, index: usize) -> Result<&Video> {
        self.videos
            .get(index)
            .ok_or(SummaryError::VideoNotFound(index))
    }

    pub fn video_mut(&mut self, index: usize) -> Result<&mut Video> {
        self.videos
            .get_mut(index)
            .ok_or(SummaryError::VideoNotFound(index))
    }

    pub fn segment(&self, key: SegmentKey) -> Result<&Segment> {
        self.video(key.video)?
            .segment(key.segment)
            .ok_or(SummaryError::SegmentNotFound {
                video: key.video,
                segment: key.segment,
            })
    }

    /// Every segment key in video-then-segment order.
    pub fn keys(&self) -> Vec<SegmentKey> {
        self.videos
            .iter()
            .enumerate()
            .flat_map(|(v, video)| (0..video.len()).map(move |s| SegmentKey::new(v, s)))
            .collect()
    }

    /// Sum of each video's final segment end time.
    pub fn total_runtime_secs(&self) -> u64 {
        self.videos.iter().map(|v| v.runtime_secs() as u64).sum()
    }

    /// Deletes the given keys from their owning videos. Keys must all refer
    /// to the same snapshot of the set.
    pub fn delete_keys(&mut self, keys: &[SegmentKey]) -> Result<Vec<Segment>> {
        for key in keys {
            self.segment(*key)?;
        }
        let mut removed = Vec::new();
        for (video_index, video) in self.videos.iter_mut().enumerate() {
            let indices: Vec<usize> = keys
                .iter()
                .filter(|k| k.video == video_index)
                .map(|k| k.segment)
                .collect();
            if indices.is_empty() {
                continue;
            }
            removed.extend(video.delete_segments(&indices));
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(name: &str, ends: &[u32]) -> Video {
        let mut begin = 0;
        let segments = ends
            .iter()
            .map(|&end| {
                let seg = Segment::new(0, begin, end, format!("{}-{}", name, end));
                begin = end;
                seg
            })
            .collect();
        Video::new(name, segments)
    }

    #[test]
    fn test_back_references_assigned() {
        let set = VideoSet::new(vec![video("a", &[5, 10]), video("b", &[3])]);
        assert_eq!(set.segment(SegmentKey::new(1, 0)).unwrap().video, 1);
        assert_eq!(set.keys().len(), 3);
        assert_eq!(set.total_runtime_secs(), 13);
    }

    #[test]
    fn test_delete_keeps_indices_stable() {
        let mut set = VideoSet::new(vec![video("a", &[1, 2, 3, 4]), video("b", &[5, 6])]);
        let removed = set
            .delete_keys(&[SegmentKey::new(0, 1), SegmentKey::new(0, 3), SegmentKey::new(1, 0)])
            .unwrap();
        assert_eq!(removed.len(), 3);
        let remaining: Vec<u32> = set.video(0).unwrap().segments().iter().map(|s| s.end).collect();
        assert_eq!(remaining, vec![1, 3]);
        assert_eq!(set.video(1).unwrap().segments()[0].end, 6);
    }

    #[test]
    fn test_delete_unknown_key_fails() {
        let mut set = VideoSet::new(vec![video("a", &[1])]);
        assert!(matches!(
            set.delete_keys(&[SegmentKey::new(0, 4)]),
            Err(SummaryError::SegmentNotFound { .. })
        ));
    }

    #[test]
    fn test_leading_segments_before() {
        let v = video("a", &[4, 9, 15]);
        assert_eq!(v.leading_segments_before(0), 0);
        assert_eq!(v.leading_segments_before(5), 2);
        assert_eq!(v.leading_segments_before(100), 3);
    }
}
