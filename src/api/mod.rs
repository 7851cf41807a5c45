pub mod models;
pub mod summarizer;
