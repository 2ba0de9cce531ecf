pub mod token;
pub mod cluster;
pub mod report;

pub use token::{parse_wallet, RegistrySnapshot, ScanSubject, TokenIdentity, TokenRecord, TrustLevel};
pub use cluster::{CreatorProfile, SuspicionCluster};
pub use report::{
    ClusterSummary, CreatorClusterStats, CreatorTrustReport, DexClusterSummary, DexSuspicionReport, Report,
    ScanFailure, ScanResponse, TokenTrustReport,
};
