pub mod summary;

pub use summary::{PlannedSegment, SummaryPlan};
