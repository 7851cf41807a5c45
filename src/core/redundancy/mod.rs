pub mod cluster;
pub mod engine;
pub mod selector;
pub mod similarity;
pub mod timeline;

pub use cluster::{Cluster, ClusterBuilder};
pub use engine::{RedundancyEngine, RedundancyOutcome};
pub use selector::{RepresentativeChoice, RepresentativeSelector};
pub use similarity::{MatchPair, SimilarityGraph};
pub use timeline::TimelineMerger;
