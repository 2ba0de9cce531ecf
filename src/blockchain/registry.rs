//! On-chain registry adapter

use async_trait::async_trait;
use ethers::prelude::*;
use std::sync::Arc;

use super::client::BlockchainClient;
use crate::contracts::{ITokenRegistry, LogbookEntry};
use crate::core::RegistrySource;
use crate::models::{RegistrySnapshot, TokenRecord, TrustLevel};
use crate::utils::{Result, ScanError};

/// Registry source backed by the deployed registry contract
pub struct OnChainRegistry<M> {
    contract: ITokenRegistry<M>,
}

impl OnChainRegistry<Provider<Http>> {
    /// Connect and check that the registry address holds code
    pub async fn connect(client: Arc<BlockchainClient>, registry: Address) -> Result<Self> {
        if !client.is_contract(registry).await? {
            return Err(ScanError::InvalidAddress(format!(
                "no registry contract at {:?} on {}",
                registry,
                client.chain_name()
            )));
        }

        let block = client.block_number().await?;
        tracing::info!("Registry {:?} found at block {}", registry, block);

        Ok(Self::new(client.provider.clone(), registry))
    }
}

impl<M: Middleware> OnChainRegistry<M> {
    pub fn new(provider: Arc<M>, registry: Address) -> Self {
        Self {
            contract: ITokenRegistry::new(registry, provider),
        }
    }
}

/// Convert a raw entry; out-of-range trust levels come back as `None`
fn to_record(index: usize, entry: LogbookEntry) -> (TokenRecord, Option<TrustLevel>) {
    // Timestamps that don't fit are treated as unknown
    let registered_at = if entry.timestamp > U256::from(u64::MAX) {
        0
    } else {
        entry.timestamp.as_u64()
    };
    let trust_level = TrustLevel::from_raw(entry.trust_level);

    let record = TokenRecord {
        name: entry.name,
        symbol: entry.symbol,
        address: entry.token,
        creator: entry.registered_by,
        registered_at,
        trust_level: trust_level.unwrap_or_default(),
        logbook_index: index,
    };
    (record, trust_level)
}

#[async_trait]
impl<M: Middleware + 'static> RegistrySource for OnChainRegistry<M> {
    fn name(&self) -> &'static str {
        "on-chain registry"
    }

    async fn logbook(&self) -> Result<RegistrySnapshot> {
        let entries = self
            .contract
            .get_logbook()
            .call()
            .await
            .map_err(|e| ScanError::ContractCallError(format!("getLogbook failed: {}", e)))?;

        tracing::debug!("Read {} logbook entries", entries.len());

        let mut records = Vec::with_capacity(entries.len());
        let mut unresolved = Vec::new();
        for (index, (name, symbol, token, registered_by, timestamp, trust_level)) in
            entries.into_iter().enumerate()
        {
            let entry = LogbookEntry {
                name,
                symbol,
                token,
                registered_by,
                timestamp,
                trust_level,
            };
            let (record, level) = to_record(index, entry);
            if level.is_none() {
                unresolved.push(index);
            }
            records.push(record);
        }

        if !unresolved.is_empty() {
            tracing::warn!(
                "⚠️  {} logbook entries carry an invalid trust level, querying getTrustLevel",
                unresolved.len()
            );

            let pending: Vec<(usize, Address)> = unresolved
                .iter()
                .map(|&index| (index, records[index].address))
                .collect();
            let lookups = pending
                .into_iter()
                .map(|(index, token)| async move { (index, self.trust_level(token).await) });

            for (index, outcome) in futures::future::join_all(lookups).await {
                match outcome {
                    Ok(level) => records[index].trust_level = level,
                    Err(e) => tracing::warn!(
                        "Trust level fallback failed for {:?}, treating as unverified: {}",
                        records[index].address,
                        e
                    ),
                }
            }
        }

        Ok(RegistrySnapshot::new(records))
    }

    async fn trust_level(&self, token: Address) -> Result<TrustLevel> {
        let raw = self
            .contract
            .get_trust_level(token)
            .call()
            .await
            .map_err(|e| ScanError::ContractCallError(format!("getTrustLevel failed: {}", e)))?;

        TrustLevel::from_raw(raw).ok_or_else(|| {
            ScanError::ContractCallError(format!("trust level {} out of range for {:?}", raw, token))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{self, Token, Tokenizable};
    use ethers::providers::MockProvider;

    fn entry(name: &str, timestamp: U256, level: u8) -> LogbookEntry {
        LogbookEntry {
            name: name.to_string(),
            symbol: "BTC".to_string(),
            token: Address::from_low_u64_be(0xC000u64.wrapping_add(timestamp.low_u64())),
            registered_by: Address::from_low_u64_be(2),
            timestamp,
            trust_level: level,
        }
    }

    fn mocked_registry() -> (OnChainRegistry<Provider<MockProvider>>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        let registry = OnChainRegistry::new(Arc::new(provider), Address::from_low_u64_be(0x5EED));
        (registry, mock)
    }

    fn logbook_response(entries: Vec<LogbookEntry>) -> Bytes {
        Bytes::from(abi::encode(&[entries.into_token()]))
    }

    fn trust_level_response(level: u8) -> Bytes {
        Bytes::from(abi::encode(&[Token::Uint(U256::from(level))]))
    }

    #[test]
    fn test_entry_conversion() {
        let (record, level) = to_record(4, entry("Bitcoin", U256::from(1_700_000_000u64), 2));

        assert_eq!(record.logbook_index, 4);
        assert_eq!(record.registered_at, 1_700_000_000);
        assert_eq!(record.creator, Address::from_low_u64_be(2));
        assert_eq!(level, Some(TrustLevel::ExchangeVerified));
        assert_eq!(record.trust_level, TrustLevel::ExchangeVerified);
    }

    #[test]
    fn test_out_of_range_values() {
        let (record, level) = to_record(0, entry("Bitcoin", U256::MAX, 9));

        assert!(record.is_ambiguous());
        assert_eq!(level, None);
        assert_eq!(record.trust_level, TrustLevel::Unverified);
    }

    #[tokio::test]
    async fn test_logbook_decodes_entries_in_order() {
        let (registry, mock) = mocked_registry();
        mock.push::<Bytes, _>(logbook_response(vec![
            entry("Bitcoin", U256::from(100u64), 3),
            entry("Bitc0in", U256::zero(), 0),
            entry("Bitcoim", U256::from(300u64), 1),
        ]))
        .unwrap();

        let snapshot = registry.logbook().await.unwrap();
        let records = snapshot.records();

        assert_eq!(snapshot.len(), 3);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bitcoin", "Bitc0in", "Bitcoim"]);
        assert_eq!(records[0].trust_level, TrustLevel::Audited);
        assert!(records[1].is_ambiguous());
        assert!(!records[2].is_ambiguous());
        assert_eq!(records[2].logbook_index, 2);
    }

    #[tokio::test]
    async fn test_invalid_trust_level_falls_back_to_lookup() {
        let (registry, mock) = mocked_registry();
        // Responses are served last-pushed first
        mock.push::<Bytes, _>(trust_level_response(2)).unwrap();
        mock.push::<Bytes, _>(logbook_response(vec![
            entry("Bitcoin", U256::from(100u64), 3),
            entry("Bitc0in", U256::from(200u64), 9),
        ]))
        .unwrap();

        let snapshot = registry.logbook().await.unwrap();

        assert_eq!(snapshot.records()[0].trust_level, TrustLevel::Audited);
        assert_eq!(snapshot.records()[1].trust_level, TrustLevel::ExchangeVerified);
    }

    #[tokio::test]
    async fn test_trust_level_lookup() {
        let (registry, mock) = mocked_registry();
        let token = Address::from_low_u64_be(0xC064);

        mock.push::<Bytes, _>(trust_level_response(3)).unwrap();
        assert_eq!(registry.trust_level(token).await.unwrap(), TrustLevel::Audited);

        mock.push::<Bytes, _>(trust_level_response(7)).unwrap();
        assert!(matches!(
            registry.trust_level(token).await,
            Err(ScanError::ContractCallError(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_call_is_transient() {
        let (registry, _mock) = mocked_registry();

        let err = registry.logbook().await.unwrap_err();
        assert!(err.is_transient());
    }
}
