pub mod contracts;      // Registry contract bindings
pub mod storage;        // Offline snapshot files
pub mod similarity;     // Canonicalization + clone classifier

pub mod core;
pub mod config;
pub mod models;
pub mod analyzers;
pub mod blockchain;
pub mod utils;

pub use crate::core::{RegistryScanner, RegistrySource};
pub use config::{RetryPolicy, ScanConfig};
pub use models::{
    CreatorClusterStats, CreatorProfile, CreatorTrustReport, DexSuspicionReport, RegistrySnapshot, Report,
    ScanResponse, SuspicionCluster, TokenRecord, TokenTrustReport, TrustLevel,
};
pub use utils::{Result, ScanError};
