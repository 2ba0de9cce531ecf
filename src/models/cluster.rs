use ethers::types::Address;
use serde::{Deserialize, Serialize};

use super::token::TokenRecord;
use crate::similarity::Regime;

/// Group of registered identities suspected to be clones of one root
#[derive(Debug, Clone, Serialize)]
pub struct SuspicionCluster {
    pub root: TokenRecord,
    /// Deduplicated by canonical identity, logbook order; a registered scan
    /// subject missing from the logbook pass is appended last
    pub members: Vec<TokenRecord>,
    /// Member nearest to the root, `None` when the root stands alone
    pub closest: Option<TokenRecord>,
    /// Regime under which the scanned identity matched the root
    pub regime: Regime,
}

impl SuspicionCluster {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Most recently registered member
    pub fn last_member(&self) -> Option<&TokenRecord> {
        self.members
            .iter()
            .max_by_key(|m| (m.registered_at, m.logbook_index))
    }
}

/// Per-wallet cluster statistics from a whole-registry aggregation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorProfile {
    pub creator: Address,
    /// Distinct clusters holding at least one of the creator's tokens
    pub cluster_count: usize,
    /// Total memberships of the creator's tokens across all clusters
    pub cluster_size: usize,
    pub total_tokens: usize,
    pub risk_score: f64,
}

impl CreatorProfile {
    pub fn new(creator: Address, cluster_count: usize, cluster_size: usize, total_tokens: usize) -> Self {
        let risk_score = if cluster_count > 0 && total_tokens > 0 {
            (cluster_size * cluster_count) as f64 + cluster_count as f64 / total_tokens as f64
        } else {
            0.0
        };

        Self {
            creator,
            cluster_count,
            cluster_size,
            total_tokens,
            risk_score,
        }
    }
}
