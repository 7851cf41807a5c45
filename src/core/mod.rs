pub mod config;
pub mod criteria;
pub mod error;
pub mod pipeline;
pub mod redundancy;
pub mod summary;
pub mod text;
pub mod video;
pub mod visual;

pub use config::SummarizerConfig;
pub use error::{Result, SummaryError};
pub use pipeline::Pipeline;
pub use summary::{Summary, SummaryContext, SummaryEntry};
