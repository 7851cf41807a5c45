pub mod dataset;
pub mod frame;
pub mod frame_store;
pub mod segment;
pub mod video;

pub use dataset::{Dataset, DatasetLoader};
pub use frame::Frame;
pub use frame_store::{DirectoryFrameStore, FrameStore, InMemoryFrameStore};
pub use segment::{Segment, SegmentKey};
pub use video::{Video, VideoSet};
