//! 摘要配置

use crate::core::error::{Result, SummaryError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Similarity threshold anchored at `base` for a set whose combined runtime
/// equals `reference_runtime_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub base: f64,
    pub reference_runtime_secs: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            base: 0.17,
            reference_runtime_secs: 785.0,
        }
    }
}

impl ThresholdConfig {
    /// `base + base * (runtime - reference) / reference`
    pub fn threshold_for(&self, total_runtime_secs: f64) -> f64 {
        let dif = (total_runtime_secs - self.reference_runtime_secs) / self.reference_runtime_secs;
        self.base + self.base * dif
    }
}

/// What to do when the visual vocabulary cannot be fitted with the requested size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyFallback {
    /// Refit with as many words as there are distinct descriptors.
    #[default]
    Shrink,
    /// Skip quality scoring; every segment scores 0 and ties go to the lowest key.
    LowestKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    pub vocabulary_size: usize,
    pub kmeans_iterations: usize,
    pub seed: u64,
    /// pHash + 直方图组合差异阈值，超过才算新的关键帧
    pub keyframe_diff_threshold: f32,
    /// Side of the square the frame is resized to before descriptor extraction.
    pub descriptor_frame_size: u32,
    /// Cells per side; each cell yields at most one descriptor.
    pub descriptor_grid: u32,
    /// Mean gradient magnitude below which a cell is considered flat.
    pub min_cell_energy: f32,
    pub fallback: VocabularyFallback,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            vocabulary_size: 300,
            kmeans_iterations: 20,
            seed: 0x5eed,
            keyframe_diff_threshold: 0.10,
            descriptor_frame_size: 128,
            descriptor_grid: 8,
            min_cell_energy: 4.0,
            fallback: VocabularyFallback::Shrink,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub threshold: ThresholdConfig,
    pub visual: VisualConfig,
    /// Histogram intersection below which two consecutive frames mark the end of the introduction.
    pub introduction_threshold: f32,
    pub language: String,
    /// `None` uses the number of CPUs, capped at 4.
    pub worker_threads: Option<usize>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            threshold: ThresholdConfig::default(),
            visual: VisualConfig::default(),
            introduction_threshold: 0.7,
            language: "portuguese".to_string(),
            worker_threads: None,
        }
    }
}

impl SummarizerConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threshold.reference_runtime_secs <= 0.0 {
            return Err(SummaryError::Config(
                "threshold.reference_runtime_secs must be positive".to_string(),
            ));
        }
        if self.visual.vocabulary_size == 0 {
            return Err(SummaryError::Config(
                "visual.vocabulary_size must be at least 1".to_string(),
            ));
        }
        if self.visual.descriptor_grid == 0
            || self.visual.descriptor_frame_size < self.visual.descriptor_grid * 4
        {
            return Err(SummaryError::Config(format!(
                "visual.descriptor_frame_size ({}) too small for a {}x{} grid",
                self.visual.descriptor_frame_size,
                self.visual.descriptor_grid,
                self.visual.descriptor_grid
            )));
        }
        if !(0.0..=1.0).contains(&self.introduction_threshold) {
            return Err(SummaryError::Config(
                "introduction_threshold must be within [0, 1]".to_string(),
            ));
        }
        if self.worker_threads == Some(0) {
            return Err(SummaryError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
            .unwrap_or_else(|| num_cpus::get().min(4))
            .max(1)
    }

    /// Dedicated pool for the parallel stages.
    pub fn build_thread_pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_threads())
            .build()
            .map_err(|e| SummaryError::ThreadPool(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_at_reference_runtime() {
        let config = ThresholdConfig::default();
        assert!((config.threshold_for(785.0) - 0.17).abs() < 1e-12);
        assert!((config.threshold_for(1570.0) - 0.34).abs() < 1e-12);
        assert!(config.threshold_for(0.0).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_monotonic_over_runtime() {
        let config = ThresholdConfig::default();
        let mut previous = f64::NEG_INFINITY;
        for runtime in (0..=10_000).step_by(7) {
            let t = config.threshold_for(runtime as f64);
            assert!(t > previous, "threshold not increasing at {}s", runtime);
            previous = t;
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = SummarizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.visual.vocabulary_size, 300);
        assert!(config.worker_threads() >= 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"threshold": {"base": 0.2}, "visual": {"fallback": "lowest_key"}}"#;
        let config: SummarizerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.threshold.base, 0.2);
        assert_eq!(config.threshold.reference_runtime_secs, 785.0);
        assert_eq!(config.visual.fallback, VocabularyFallback::LowestKey);
        assert_eq!(config.language, "portuguese");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SummarizerConfig {
            worker_threads: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SummaryError::Config(_))));
    }
}
