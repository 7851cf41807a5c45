use crate::core::video::Frame;

/// 64-bin luma histogram.
pub type LumaHistogram = [u32; 64];

/// Keeps a frame only when it differs enough from the last kept one.
pub struct KeyframeFilter {
    sample_size: (u32, u32),
    threshold: f32,
    last_hash: Option<u64>,
    last_histogram: Option<LumaHistogram>,
}

impl Default for KeyframeFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyframeFilter {
    pub fn new() -> Self {
        Self::with_threshold(0.10)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            sample_size: (8, 8),
            threshold,
            last_hash: None,
            last_histogram: None,
        }
    }

    pub fn should_keep(&mut self, frame: &Frame) -> bool {
        let sample = frame.resize_to(self.sample_size.0, self.sample_size.1);
        let current_hash = Self::phash(&sample.data);
        let current_histogram = luma_histogram(frame);

        let keep = match (self.last_hash, self.last_histogram) {
            (Some(last_hash), Some(last_hist)) => {
                let hash_diff = Self::hamming_distance(current_hash, last_hash) as f32 / 64.0;
                let hist_sim = histogram_similarity(&current_histogram, &last_hist);
                hash_diff * 0.5 + (1.0 - hist_sim) * 0.5 > self.threshold
            }
            _ => true,
        };

        // 只有保留的帧才成为新的参照
        if keep {
            self.last_hash = Some(current_hash);
            self.last_histogram = Some(current_histogram);
        }
        keep
    }

    /// Keyframes of a segment: the first and last frames are dropped, the
    /// rest go through the filter.
    pub fn keyframes<'a>(&mut self, frames: &'a [Frame]) -> Vec<&'a Frame> {
        self.reset();
        if frames.len() < 3 {
            return Vec::new();
        }
        frames[1..frames.len() - 1]
            .iter()
            .filter(|f| self.should_keep(f))
            .collect()
    }

    fn phash(gray: &[u8]) -> u64 {
        if gray.is_empty() {
            return 0;
        }
        let sum: u32 = gray.iter().map(|&v| v as u32).sum();
        let mean = (sum / gray.len() as u32) as u8;

        let mut hash: u64 = 0;
        for (i, &val) in gray.iter().enumerate().take(56) {
            if val > mean {
                hash |= 1 << i;
            }
        }
        hash | ((mean as u64) << 56)
    }

    fn hamming_distance(a: u64, b: u64) -> u32 {
        (a ^ b).count_ones()
    }

    pub fn reset(&mut self) {
        self.last_hash = None;
        self.last_histogram = None;
    }
}

pub fn luma_histogram(frame: &Frame) -> LumaHistogram {
    let mut hist = [0u32; 64];
    for &val in &frame.data {
        hist[(val >> 2) as usize] += 1;
    }
    hist
}

/// Histogram intersection normalized by the larger mass, in `[0, 1]`.
pub fn histogram_similarity(h1: &LumaHistogram, h2: &LumaHistogram) -> f32 {
    let shared: u32 = h1.iter().zip(h2.iter()).map(|(a, b)| *a.min(b)).sum();
    let sum1: u32 = h1.iter().sum();
    let sum2: u32 = h2.iter().sum();

    if sum1 == 0 || sum2 == 0 {
        return 0.0;
    }
    shared as f32 / sum1.max(sum2) as f32
}

/// 256-bin luma histogram normalized to unit mass.
pub fn normalized_histogram(frame: &Frame) -> [f32; 256] {
    let mut hist = [0f32; 256];
    if frame.data.is_empty() {
        return hist;
    }
    for &val in &frame.data {
        hist[val as usize] += 1.0;
    }
    let total = frame.data.len() as f32;
    hist.iter_mut().for_each(|v| *v /= total);
    hist
}

/// Intersection of the frames' full-resolution luma histograms, in `[0, 1]`.
pub fn frame_similarity(a: &Frame, b: &Frame) -> f32 {
    let (ha, hb) = (normalized_histogram(a), normalized_histogram(b));
    ha.iter().zip(hb.iter()).map(|(x, y)| x.min(*y)).sum()
}
