use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cluster::CreatorProfile;
use super::token::TrustLevel;
use crate::utils::{Result, ScanError};

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// Common surface of every scan report
pub trait Report: Serialize + fmt::Display {
    /// Whether the report points at clone activity
    fn flags_suspicion(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub size: usize,
    pub root_label: String,
    pub closest_label: Option<String>,
}

/// Trust score for a single token identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenTrustReport {
    pub identity: String,
    pub address: Option<Address>,
    pub creator: Option<Address>,
    pub registered_at: Option<u64>,
    pub trust_level: TrustLevel,
    pub cluster: Option<ClusterSummary>,
    pub is_base: bool,
    pub score: u8,
    pub recommendation: String,
}

impl Report for TokenTrustReport {
    fn flags_suspicion(&self) -> bool {
        !self.is_base
    }
}

impl fmt::Display for TokenTrustReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "                TOKEN TRUST REPORT")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        write_registration(f, &self.identity, self.address, self.creator, self.registered_at, self.trust_level)?;
        writeln!(f)?;
        writeln!(f, "═══ CLUSTER ═══")?;
        match &self.cluster {
            Some(cluster) => {
                writeln!(f, "Size: {}", cluster.size)?;
                writeln!(f, "Root: {}", cluster.root_label)?;
                if let Some(closest) = &cluster.closest_label {
                    writeln!(f, "Closest: {}", closest)?;
                }
            }
            None => writeln!(f, "No suspicion cluster")?,
        }
        writeln!(f)?;
        writeln!(f, "═══ VERDICT ═══")?;
        let marker = if self.is_base { "🟢" } else { "🔴" };
        writeln!(f, "{} Trust Score: {}/100", marker, self.score)?;
        writeln!(f, "💬 {}", self.recommendation)?;
        writeln!(f, "{}", RULE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexClusterSummary {
    pub size: usize,
    pub base_label: String,
    pub closest_label: Option<String>,
    pub last_member_label: Option<String>,
}

/// Listing advisory for an exchange; carries no numeric score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DexSuspicionReport {
    pub identity: String,
    pub address: Option<Address>,
    pub creator: Option<Address>,
    pub registered_at: Option<u64>,
    pub trust_level: TrustLevel,
    pub cluster: Option<DexClusterSummary>,
    pub recommendation: String,
}

impl Report for DexSuspicionReport {
    fn flags_suspicion(&self) -> bool {
        self.cluster.is_some()
    }
}

impl fmt::Display for DexSuspicionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "              DEX LISTING SUSPICION REPORT")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        write_registration(f, &self.identity, self.address, self.creator, self.registered_at, self.trust_level)?;
        writeln!(f)?;
        writeln!(f, "═══ CLUSTER ═══")?;
        match &self.cluster {
            Some(cluster) => {
                writeln!(f, "Size: {}", cluster.size)?;
                writeln!(f, "Base: {}", cluster.base_label)?;
                if let Some(closest) = &cluster.closest_label {
                    writeln!(f, "Closest: {}", closest)?;
                }
                if let Some(last) = &cluster.last_member_label {
                    writeln!(f, "Latest: {}", last)?;
                }
            }
            None => writeln!(f, "No suspicion cluster")?,
        }
        writeln!(f)?;
        let marker = if self.cluster.is_some() { "🟠" } else { "🟢" };
        writeln!(f, "{} {}", marker, self.recommendation)?;
        writeln!(f, "{}", RULE)
    }
}

/// Clone-count trust score for a creator wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorTrustReport {
    pub creator: Address,
    pub total_tokens: usize,
    pub suspicious_count: usize,
    pub score: u8,
    pub recommendation: String,
}

impl Report for CreatorTrustReport {
    fn flags_suspicion(&self) -> bool {
        self.suspicious_count > 0
    }
}

impl fmt::Display for CreatorTrustReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "               CREATOR TRUST REPORT")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        writeln!(f, "Creator: {:?}", self.creator)?;
        writeln!(f, "Tokens registered: {}", self.total_tokens)?;
        writeln!(f, "Suspected clones: {}", self.suspicious_count)?;
        writeln!(f)?;
        writeln!(f, "Trust Score: {}/100", self.score)?;
        writeln!(f, "💬 {}", self.recommendation)?;
        writeln!(f, "{}", RULE)
    }
}

/// Cluster risk ranking with the requested creator's position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorClusterStats {
    pub creator: Address,
    pub ranked_top: Option<CreatorProfile>,
    /// `None` when the wallet never registered a token
    pub target: Option<CreatorProfile>,
    pub ranking: Vec<CreatorProfile>,
}

impl Report for CreatorClusterStats {
    fn flags_suspicion(&self) -> bool {
        self.target.as_ref().map(|t| t.cluster_count > 0).unwrap_or(false)
    }
}

impl fmt::Display for CreatorClusterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "              CREATOR CLUSTER STATISTICS")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        writeln!(f, "═══ RANKING ═══")?;
        if self.ranking.is_empty() {
            writeln!(f, "Registry is empty")?;
        }
        for (rank, profile) in self.ranking.iter().enumerate() {
            writeln!(
                f,
                "{:>3}. {:?}  clusters: {}  memberships: {}  risk: {:.2}",
                rank + 1,
                profile.creator,
                profile.cluster_count,
                profile.cluster_size,
                profile.risk_score
            )?;
        }
        writeln!(f)?;
        writeln!(f, "═══ TARGET ═══")?;
        match &self.target {
            Some(target) => {
                writeln!(f, "Creator: {:?}", target.creator)?;
                writeln!(f, "Clusters: {}", target.cluster_count)?;
                writeln!(f, "Memberships: {}", target.cluster_size)?;
                writeln!(f, "Tokens: {}", target.total_tokens)?;
                writeln!(f, "Risk Score: {:.2}", target.risk_score)?;
            }
            None => writeln!(f, "{:?} has no registered tokens", self.creator)?,
        }
        writeln!(f, "{}", RULE)
    }
}

fn write_registration(
    f: &mut fmt::Formatter<'_>,
    identity: &str,
    address: Option<Address>,
    creator: Option<Address>,
    registered_at: Option<u64>,
    trust_level: TrustLevel,
) -> fmt::Result {
    writeln!(f, "Identity: {}", identity)?;
    match address {
        Some(address) => {
            writeln!(f, "Address: {:?}", address)?;
            if let Some(creator) = creator {
                writeln!(f, "Creator: {:?}", creator)?;
            }
            if let Some(registered_at) = registered_at {
                writeln!(f, "Registered: {}", registered_at)?;
            }
            writeln!(f, "Trust Level: {} ({:?})", trust_level.as_u8(), trust_level)
        }
        None => writeln!(f, "Not registered"),
    }
}

/// Failure detail carried in a response payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFailure {
    pub kind: String,
    pub message: String,
}

impl From<&ScanError> for ScanFailure {
    fn from(error: &ScanError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Scan outcome as returned to callers; failures never look like clean results
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanResponse<T> {
    Completed { report: T },
    Failed { error: ScanFailure },
}

impl<T> From<Result<T>> for ScanResponse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(report) => ScanResponse::Completed { report },
            Err(e) => ScanResponse::Failed { error: ScanFailure::from(&e) },
        }
    }
}
