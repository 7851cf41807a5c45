pub mod descriptor;
pub mod keyframe;
pub mod quality;
pub mod vocabulary;

pub use descriptor::{Descriptor, DescriptorExtractor};
pub use keyframe::{
    frame_similarity, histogram_similarity, luma_histogram, normalized_histogram, KeyframeFilter,
};
pub use quality::{BovwQualityScorer, QualityScorer, QualityScores, StaticQualityScorer};
pub use vocabulary::VisualVocabulary;
