use std::sync::Arc;

use crate::analyzers::{ClusterBuilder, CreatorAggregator, TrustScorer};
use crate::config::{RetryPolicy, ScanConfig};
use crate::core::RegistrySource;
use crate::models::{
    parse_wallet, ClusterSummary, CreatorClusterStats, CreatorTrustReport, DexClusterSummary, DexSuspicionReport,
    RegistrySnapshot, ScanSubject, SuspicionCluster, TokenIdentity, TokenRecord, TokenTrustReport, TrustLevel,
};
use crate::similarity::SimilarityClassifier;
use crate::utils::{Result, ScanError};

/// Entry point for every report: validates input, takes one snapshot per
/// scan and runs the shared clustering and scoring logic over it
pub struct RegistryScanner {
    source: Arc<dyn RegistrySource>,
    builder: ClusterBuilder,
    scorer: TrustScorer,
    aggregator: CreatorAggregator,
    retry: RetryPolicy,
    ranking_limit: usize,
}

impl RegistryScanner {
    pub fn new(source: Arc<dyn RegistrySource>) -> Self {
        Self::with_config(source, ScanConfig::default())
    }

    pub fn with_config(source: Arc<dyn RegistrySource>, config: ScanConfig) -> Self {
        let builder = ClusterBuilder::new(SimilarityClassifier::new(config.similarity));
        let scorer = TrustScorer::new(config.scoring);
        let aggregator = CreatorAggregator::new(builder.clone(), scorer.clone());

        Self {
            source,
            builder,
            scorer,
            aggregator,
            retry: config.retry,
            ranking_limit: config.ranking_limit,
        }
    }

    /// Read the logbook with a per-attempt timeout and bounded retries.
    ///
    /// Exhausted retries surface as `UpstreamUnavailable`, never as an empty
    /// snapshot.
    pub async fn snapshot(&self) -> Result<RegistrySnapshot> {
        let attempts = self.retry.attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match tokio::time::timeout(self.retry.timeout(), self.source.logbook()).await {
                Ok(Ok(snapshot)) => {
                    tracing::info!(
                        "📖 Read {} logbook entries from {} (attempt {}/{})",
                        snapshot.len(),
                        self.source.name(),
                        attempt,
                        attempts
                    );
                    return Ok(snapshot);
                }
                Ok(Err(e)) if !e.is_transient() => return Err(e),
                Ok(Err(e)) => {
                    tracing::warn!("Logbook read failed (attempt {}/{}): {}", attempt, attempts, e);
                    last_error = e.to_string();
                }
                Err(_) => {
                    tracing::warn!(
                        "⏱️  Logbook read timed out after {:?} (attempt {}/{})",
                        self.retry.timeout(),
                        attempt,
                        attempts
                    );
                    last_error = format!("timed out after {:?}", self.retry.timeout());
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.retry.backoff(attempt)).await;
            }
        }

        Err(ScanError::UpstreamUnavailable {
            attempts,
            reason: last_error,
        })
    }

    /// Trust score for a name+symbol pair
    pub async fn token_trust_scan(&self, name: &str, symbol: &str) -> Result<TokenTrustReport> {
        let identity = TokenIdentity::parse(name, symbol)?;
        tracing::info!("🔍 Token trust scan for {}", identity.label());

        let snapshot = self.snapshot().await?;
        let subject = self.locate(identity, &snapshot).await;
        let cluster = self.builder.build(&subject, &snapshot);
        let assessment = self
            .scorer
            .assess(subject.trust_level(), &subject.canonical(), cluster.as_ref());

        if !assessment.is_base {
            tracing::warn!("🚨 {} looks like a clone (score {})", subject.label(), assessment.score);
        }

        let record = subject.record();
        Ok(TokenTrustReport {
            identity: subject.label(),
            address: record.map(|r| r.address),
            creator: record.map(|r| r.creator),
            registered_at: record.map(|r| r.registered_at),
            trust_level: subject.trust_level(),
            cluster: cluster.as_ref().map(|c| ClusterSummary {
                size: c.size(),
                root_label: c.root.label(),
                closest_label: c.closest.as_ref().map(TokenRecord::label),
            }),
            is_base: assessment.is_base,
            score: assessment.score,
            recommendation: assessment.recommendation.to_string(),
        })
    }

    /// Listing advisory for a name+symbol pair
    pub async fn dex_suspicion_scan(&self, name: &str, symbol: &str) -> Result<DexSuspicionReport> {
        let identity = TokenIdentity::parse(name, symbol)?;
        tracing::info!("🔍 DEX suspicion scan for {}", identity.label());

        let snapshot = self.snapshot().await?;
        let subject = self.locate(identity, &snapshot).await;
        let cluster = self.builder.build(&subject, &snapshot);
        let recommendation = Self::listing_advice(&subject, cluster.as_ref());

        let record = subject.record();
        Ok(DexSuspicionReport {
            identity: subject.label(),
            address: record.map(|r| r.address),
            creator: record.map(|r| r.creator),
            registered_at: record.map(|r| r.registered_at),
            trust_level: subject.trust_level(),
            cluster: cluster.as_ref().map(|c| DexClusterSummary {
                size: c.size(),
                base_label: c.root.label(),
                closest_label: c.closest.as_ref().map(TokenRecord::label),
                last_member_label: c.last_member().map(TokenRecord::label),
            }),
            recommendation,
        })
    }

    /// Clone-count trust score for a creator wallet
    pub async fn creator_trust_scan(&self, creator: &str) -> Result<CreatorTrustReport> {
        let creator = parse_wallet(creator)?;
        tracing::info!("🔍 Creator trust scan for {:?}", creator);

        let snapshot = self.snapshot().await?;
        Ok(self.aggregator.creator_trust(&snapshot, creator))
    }

    /// Cluster risk ranking and the creator's place in it
    pub async fn creator_cluster_stats(&self, creator: &str) -> Result<CreatorClusterStats> {
        let creator = parse_wallet(creator)?;
        tracing::info!("🔍 Creator cluster statistics for {:?}", creator);

        let snapshot = self.snapshot().await?;
        Ok(self.aggregator.cluster_stats(&snapshot, creator, self.ranking_limit))
    }

    /// Resolve the identity against the logbook, refreshing the trust level
    /// of a registered match
    async fn locate(&self, identity: TokenIdentity, snapshot: &RegistrySnapshot) -> ScanSubject {
        let Some(record) = snapshot.find_identity(&identity) else {
            tracing::info!("{} is not registered", identity.label());
            return ScanSubject::Proposed(identity);
        };

        let mut record = record.clone();
        record.trust_level = self.refresh_trust_level(&record).await;
        ScanSubject::Registered(record)
    }

    async fn refresh_trust_level(&self, record: &TokenRecord) -> TrustLevel {
        match tokio::time::timeout(self.retry.timeout(), self.source.trust_level(record.address)).await {
            Ok(Ok(level)) => level,
            Ok(Err(e)) => {
                tracing::warn!("Trust level lookup failed for {:?}, using logbook value: {}", record.address, e);
                record.trust_level
            }
            Err(_) => {
                tracing::warn!("Trust level lookup timed out for {:?}, using logbook value", record.address);
                record.trust_level
            }
        }
    }

    fn listing_advice(subject: &ScanSubject, cluster: Option<&SuspicionCluster>) -> String {
        let Some(cluster) = cluster else {
            return "no similar identities registered, safe to proceed".to_string();
        };

        if cluster.root.canonical().key() == subject.canonical().key() {
            format!(
                "listed identity is the base of a {}-member suspicion cluster; review look-alikes before listing",
                cluster.size()
            )
        } else {
            format!(
                "suspected clone of {}; do not list without manual review",
                cluster.root.label()
            )
        }
    }
}
