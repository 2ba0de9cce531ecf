//! Offline registry snapshots
//!
//! A snapshot file is a JSON array of logbook records in append order. It
//! lets scans run without RPC access, e.g. against an exported logbook.

use async_trait::async_trait;
use ethers::types::Address;
use std::path::Path;

use crate::core::RegistrySource;
use crate::models::{RegistrySnapshot, TokenRecord, TrustLevel};
use crate::utils::{Result, ScanError};

/// Read a snapshot file
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<RegistrySnapshot> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let snapshot: RegistrySnapshot = serde_json::from_str(&raw)?;

    tracing::debug!("Loaded {} records from {}", snapshot.len(), path.display());
    Ok(snapshot)
}

/// Write a snapshot file
pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &RegistrySnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Registry source over an in-memory logbook
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    snapshot: RegistrySnapshot,
}

impl MemoryRegistry {
    pub fn new(records: Vec<TokenRecord>) -> Self {
        Self {
            snapshot: RegistrySnapshot::new(records),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            snapshot: load_snapshot(path)?,
        })
    }
}

#[async_trait]
impl RegistrySource for MemoryRegistry {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    async fn logbook(&self) -> Result<RegistrySnapshot> {
        Ok(self.snapshot.clone())
    }

    async fn trust_level(&self, token: Address) -> Result<TrustLevel> {
        self.snapshot
            .find_address(token)
            .map(|r| r.trust_level)
            .ok_or_else(|| ScanError::ContractCallError(format!("token {:?} not in snapshot", token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, symbol: &str, registered_at: u64, trust_level: TrustLevel) -> TokenRecord {
        TokenRecord {
            name: name.to_string(),
            symbol: symbol.to_string(),
            address: Address::from_low_u64_be(registered_at),
            creator: Address::from_low_u64_be(1),
            registered_at,
            trust_level,
            logbook_index: 0,
        }
    }

    #[test]
    fn test_save_and_load_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logbook.json");
        let snapshot = RegistrySnapshot::new(vec![
            record("Alpha", "ALP", 100, TrustLevel::Audited),
            record("Beta", "BET", 200, TrustLevel::Registered),
        ]);

        save_snapshot(&path, &snapshot).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_snapshot(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ScanError::IoError(_))));
    }

    #[tokio::test]
    async fn test_memory_trust_lookup() {
        let registry = MemoryRegistry::new(vec![record("Alpha", "ALP", 100, TrustLevel::Audited)]);

        let level = registry.trust_level(Address::from_low_u64_be(100)).await.unwrap();
        assert_eq!(level, TrustLevel::Audited);
        assert!(registry.trust_level(Address::from_low_u64_be(5)).await.is_err());
    }
}
