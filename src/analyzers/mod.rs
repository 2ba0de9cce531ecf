pub mod cluster_builder;
pub mod trust_scorer;
pub mod creator_aggregator;

pub use cluster_builder::{index_snapshot, ClusterBuilder, IndexedRecord, RootCandidate};
pub use trust_scorer::{ScoringPolicy, TrustAssessment, TrustScorer};
pub use creator_aggregator::CreatorAggregator;
