//! Creator-level risk signals
//!
//! Both signals scan the whole snapshot. Whole-registry clustering is
//! O(n²) pairwise comparisons, fine for registries up to a few thousand
//! entries.

use ethers::types::Address;
use std::collections::{HashMap, HashSet};

use super::cluster_builder::{index_snapshot, ClusterBuilder, IndexedRecord};
use super::trust_scorer::TrustScorer;
use crate::models::{CreatorClusterStats, CreatorProfile, CreatorTrustReport, RegistrySnapshot, TokenRecord};

#[derive(Debug, Clone, Default)]
pub struct CreatorAggregator {
    builder: ClusterBuilder,
    scorer: TrustScorer,
}

impl CreatorAggregator {
    pub fn new(builder: ClusterBuilder, scorer: TrustScorer) -> Self {
        Self { builder, scorer }
    }

    /// Group the registry into clusters of records suspicious against a seed.
    ///
    /// Records are visited in logbook order and each record not yet assigned
    /// seeds a cluster. The seed expands over the whole snapshot, so a record
    /// already claimed by an earlier cluster can also sit in a later one.
    /// Only clusters with more than one distinct identity are returned.
    pub fn registry_clusters<'a>(&self, snapshot: &'a RegistrySnapshot) -> Vec<Vec<&'a TokenRecord>> {
        let index = index_snapshot(snapshot);
        let classifier = self.builder.classifier();
        let mut assigned = vec![false; index.len()];
        let mut clusters = Vec::new();

        for seed in 0..index.len() {
            if assigned[seed] {
                continue;
            }

            let root = &index[seed].canonical;
            let members = self.builder.expand(root, index.iter());

            for (i, entry) in index.iter().enumerate() {
                if classifier.is_suspicious(&entry.canonical, root) {
                    assigned[i] = true;
                }
            }

            if members.len() > 1 {
                tracing::debug!(
                    "Cluster seeded by {} with {} member(s)",
                    index[seed].record.label(),
                    members.len()
                );
                clusters.push(members.into_iter().map(|m| m.record).collect());
            }
        }

        clusters
    }

    /// Cluster risk profile for every creator, ranked by risk descending.
    /// Ties keep first-appearance order.
    pub fn ranked_profiles(&self, snapshot: &RegistrySnapshot) -> Vec<CreatorProfile> {
        let creators = snapshot.creators();

        let mut totals: HashMap<Address, usize> = HashMap::new();
        for record in snapshot.records() {
            *totals.entry(record.creator).or_default() += 1;
        }

        let mut cluster_counts: HashMap<Address, usize> = HashMap::new();
        let mut memberships: HashMap<Address, usize> = HashMap::new();
        for cluster in self.registry_clusters(snapshot) {
            let mut in_cluster = HashSet::new();
            for record in cluster {
                *memberships.entry(record.creator).or_default() += 1;
                in_cluster.insert(record.creator);
            }
            for creator in in_cluster {
                *cluster_counts.entry(creator).or_default() += 1;
            }
        }

        let mut profiles: Vec<CreatorProfile> = creators
            .into_iter()
            .map(|creator| {
                CreatorProfile::new(
                    creator,
                    cluster_counts.get(&creator).copied().unwrap_or(0),
                    memberships.get(&creator).copied().unwrap_or(0),
                    totals.get(&creator).copied().unwrap_or(0),
                )
            })
            .collect();

        profiles.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
        profiles
    }

    /// Ranking head plus the target creator's own profile
    pub fn cluster_stats(&self, snapshot: &RegistrySnapshot, creator: Address, limit: usize) -> CreatorClusterStats {
        let profiles = self.ranked_profiles(snapshot);
        let target = profiles.iter().find(|p| p.creator == creator).cloned();

        CreatorClusterStats {
            creator,
            ranked_top: profiles.first().cloned(),
            target,
            ranking: profiles.into_iter().take(limit).collect(),
        }
    }

    /// Clone-count trust score: a creator's token counts once if any other
    /// record in the registry is suspicious against it
    pub fn creator_trust(&self, snapshot: &RegistrySnapshot, creator: Address) -> CreatorTrustReport {
        let index = index_snapshot(snapshot);
        let own: Vec<&IndexedRecord> = index.iter().filter(|e| e.record.creator == creator).collect();

        let suspicious_count = own
            .iter()
            .filter(|token| self.has_clone(token, &index))
            .count();

        let score = self.scorer.creator_score(suspicious_count);
        tracing::debug!(
            "Creator {:?}: {}/{} token(s) flagged, score {}",
            creator,
            suspicious_count,
            own.len(),
            score
        );

        CreatorTrustReport {
            creator,
            total_tokens: own.len(),
            suspicious_count,
            score,
            recommendation: TrustScorer::creator_recommendation(score).to_string(),
        }
    }

    fn has_clone(&self, token: &IndexedRecord, index: &[IndexedRecord]) -> bool {
        let classifier = self.builder.classifier();
        index.iter().any(|other| {
            other.record.logbook_index != token.record.logbook_index
                && classifier.is_suspicious(&token.canonical, &other.canonical)
        })
    }
}
