//! 文本处理：预处理 + TF-IDF 向量化

pub mod preprocess;
pub mod vectorizer;

pub use preprocess::TextPreprocessor;
pub use vectorizer::{FeatureMatrix, FeatureVector, Vectorizer};
