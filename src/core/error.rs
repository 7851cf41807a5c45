use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Not enough videos to summarize: {found} given, at least 2 required")]
    NotEnoughVideos { found: usize },
    #[error("Frame directory not found: {0}")]
    MissingFrames(PathBuf),
    #[error("Unreadable transcript {path}: {reason}")]
    Transcript { path: PathBuf, reason: String },
    #[error("Invalid timestamp '{0}', expected HH:MM:SS")]
    InvalidTimestamp(String),
    #[error("Video index {0} out of range")]
    VideoNotFound(usize),
    #[error("Segment ({video}, {segment}) out of range")]
    SegmentNotFound { video: usize, segment: usize },
    #[error("Visual vocabulary fit failed: {requested} words requested, {available} distinct descriptors")]
    VocabularyFit { requested: usize, available: usize },
    #[error("Worker pool error: {0}")]
    ThreadPool(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Subjectivity lexicon error: {0}")]
    Lexicon(String),
}

impl SummaryError {
    /// Errors after which the caller may still finish the run with a degraded policy.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SummaryError::VocabularyFit { .. })
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;
