use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::similarity::CanonicalIdentity;
use crate::utils::{Result, ScanError};

/// On-chain trust badge assigned by the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TrustLevel {
    #[default]
    Unverified = 0,
    Registered = 1,
    ExchangeVerified = 2,
    Audited = 3,
}

impl TrustLevel {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(TrustLevel::Unverified),
            1 => Some(TrustLevel::Registered),
            2 => Some(TrustLevel::ExchangeVerified),
            3 => Some(TrustLevel::Audited),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TrustLevel {
    type Error = String;

    fn try_from(raw: u8) -> std::result::Result<Self, Self::Error> {
        TrustLevel::from_raw(raw).ok_or_else(|| format!("trust level {} out of range 0..=3", raw))
    }
}

impl From<TrustLevel> for u8 {
    fn from(level: TrustLevel) -> u8 {
        level.as_u8()
    }
}

/// A registered token as read from the registry logbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub name: String,
    pub symbol: String,
    pub address: Address,
    pub creator: Address,
    /// Registration time in epoch seconds; 0 means unknown
    pub registered_at: u64,
    #[serde(default)]
    pub trust_level: TrustLevel,
    /// Position in the logbook (append order)
    #[serde(default)]
    pub logbook_index: usize,
}

impl TokenRecord {
    pub fn canonical(&self) -> CanonicalIdentity {
        CanonicalIdentity::new(&self.name, &self.symbol)
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }

    /// Records without a timestamp can't be ordered against others
    pub fn is_ambiguous(&self) -> bool {
        self.registered_at == 0
    }
}

/// A name+symbol pair that may or may not be registered yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIdentity {
    pub name: String,
    pub symbol: String,
}

impl TokenIdentity {
    /// Validate raw user input.
    ///
    /// Rejects empty fields and fields with nothing left after canonicalization.
    pub fn parse(name: &str, symbol: &str) -> Result<Self> {
        let name = name.trim();
        let symbol = symbol.trim();

        for (field, value) in [("name", name), ("symbol", symbol)] {
            if value.is_empty() {
                return Err(ScanError::Validation(format!("{} must not be empty", field)));
            }
            if crate::similarity::canonicalize(value).is_empty() {
                return Err(ScanError::Validation(format!(
                    "{} {:?} has no comparable characters",
                    field, value
                )));
            }
        }

        Ok(Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
        })
    }

    pub fn canonical(&self) -> CanonicalIdentity {
        CanonicalIdentity::new(&self.name, &self.symbol)
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

/// Parse a creator wallet id
pub fn parse_wallet(raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|_| ScanError::InvalidAddress(raw.to_string()))
}

/// Input to the cluster builder
#[derive(Debug, Clone)]
pub enum ScanSubject {
    /// Already in the logbook
    Registered(TokenRecord),
    /// Proposed identity, not registered
    Proposed(TokenIdentity),
}

impl ScanSubject {
    pub fn canonical(&self) -> CanonicalIdentity {
        match self {
            ScanSubject::Registered(record) => record.canonical(),
            ScanSubject::Proposed(identity) => identity.canonical(),
        }
    }

    pub fn record(&self) -> Option<&TokenRecord> {
        match self {
            ScanSubject::Registered(record) => Some(record),
            ScanSubject::Proposed(_) => None,
        }
    }

    pub fn trust_level(&self) -> TrustLevel {
        self.record().map(|r| r.trust_level).unwrap_or_default()
    }

    pub fn label(&self) -> String {
        match self {
            ScanSubject::Registered(record) => record.label(),
            ScanSubject::Proposed(identity) => identity.label(),
        }
    }
}

/// Frozen, insertion-ordered view of the registry logbook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TokenRecord>", into = "Vec<TokenRecord>")]
pub struct RegistrySnapshot {
    records: Vec<TokenRecord>,
}

impl RegistrySnapshot {
    /// Build a snapshot; logbook indices are reassigned from position
    pub fn new(mut records: Vec<TokenRecord>) -> Self {
        for (index, record) in records.iter_mut().enumerate() {
            record.logbook_index = index;
        }
        Self { records }
    }

    pub fn records(&self) -> &[TokenRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest record sharing the identity's canonical key
    pub fn find_identity(&self, identity: &TokenIdentity) -> Option<&TokenRecord> {
        let key = identity.canonical().key();
        self.records.iter().find(|r| r.canonical().key() == key)
    }

    pub fn find_address(&self, address: Address) -> Option<&TokenRecord> {
        self.records.iter().find(|r| r.address == address)
    }

    /// Distinct creators in order of first appearance
    pub fn creators(&self) -> Vec<Address> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.creator))
            .map(|r| r.creator)
            .collect()
    }
}

impl From<Vec<TokenRecord>> for RegistrySnapshot {
    fn from(records: Vec<TokenRecord>) -> Self {
        RegistrySnapshot::new(records)
    }
}

impl From<RegistrySnapshot> for Vec<TokenRecord> {
    fn from(snapshot: RegistrySnapshot) -> Self {
        snapshot.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, symbol: &str, creator: u64, registered_at: u64) -> TokenRecord {
        TokenRecord {
            name: name.to_string(),
            symbol: symbol.to_string(),
            address: Address::from_low_u64_be(10_000 + registered_at),
            creator: Address::from_low_u64_be(creator),
            registered_at,
            trust_level: TrustLevel::Unverified,
            logbook_index: 99,
        }
    }

    #[test]
    fn test_snapshot_reindexes_in_append_order() {
        let snapshot = RegistrySnapshot::new(vec![
            record("Alpha", "ALP", 1, 100),
            record("Beta", "BET", 2, 200),
        ]);

        let indices: Vec<usize> = snapshot.records().iter().map(|r| r.logbook_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_find_identity_uses_canonical_key() {
        let snapshot = RegistrySnapshot::new(vec![
            record("Alpha Coin", "ALP", 1, 100),
            record("alphacoin", "alp", 2, 200),
        ]);

        let identity = TokenIdentity::parse("ALPHA-COIN", "a.l.p").unwrap();
        let found = snapshot.find_identity(&identity).unwrap();
        assert_eq!(found.logbook_index, 0);
    }

    #[test]
    fn test_creators_in_first_appearance_order() {
        let snapshot = RegistrySnapshot::new(vec![
            record("A", "A", 2, 1),
            record("B", "B", 1, 2),
            record("C", "C", 2, 3),
        ]);

        assert_eq!(
            snapshot.creators(),
            vec![Address::from_low_u64_be(2), Address::from_low_u64_be(1)]
        );
    }

    #[test]
    fn test_identity_validation() {
        assert!(matches!(TokenIdentity::parse("", "BTC"), Err(ScanError::Validation(_))));
        assert!(matches!(TokenIdentity::parse("Bitcoin", "   "), Err(ScanError::Validation(_))));
        assert!(matches!(TokenIdentity::parse("$$$", "BTC"), Err(ScanError::Validation(_))));
        assert_eq!(TokenIdentity::parse("  Bitcoin ", "BTC").unwrap().name, "Bitcoin");
    }

    #[test]
    fn test_wallet_parsing() {
        assert!(parse_wallet("0x0000000000000000000000000000000000000001").is_ok());
        assert!(matches!(parse_wallet("not-a-wallet"), Err(ScanError::InvalidAddress(_))));
    }

    #[test]
    fn test_trust_level_range() {
        assert_eq!(TrustLevel::from_raw(2), Some(TrustLevel::ExchangeVerified));
        assert_eq!(TrustLevel::from_raw(4), None);
        assert!(serde_json::from_str::<TrustLevel>("7").is_err());
        assert_eq!(serde_json::to_string(&TrustLevel::Audited).unwrap(), "3");
    }

    #[test]
    fn test_snapshot_json_round_trip_keeps_order() {
        let snapshot = RegistrySnapshot::new(vec![record("Alpha", "ALP", 1, 100), record("Beta", "BET", 2, 0)]);
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: RegistrySnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, snapshot);
        assert!(parsed.records()[1].is_ambiguous());
    }
}
