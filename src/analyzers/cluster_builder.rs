//! Suspicion cluster construction
//!
//! Strategy:
//! 1. Collect earlier records the subject is suspicious against (candidate roots)
//! 2. Pick the closest candidate, oldest first on ties
//! 3. Expand the root into every record suspicious against it
//! 4. Pick the member nearest to the root

use std::collections::HashSet;

use crate::models::{RegistrySnapshot, ScanSubject, SuspicionCluster, TokenRecord};
use crate::similarity::{CanonicalIdentity, Regime, SimilarityClassifier};

/// Snapshot record with its canonical identity computed once
#[derive(Debug, Clone)]
pub struct IndexedRecord<'a> {
    pub record: &'a TokenRecord,
    pub canonical: CanonicalIdentity,
}

pub fn index_snapshot(snapshot: &RegistrySnapshot) -> Vec<IndexedRecord<'_>> {
    snapshot
        .records()
        .iter()
        .map(|record| IndexedRecord {
            record,
            canonical: record.canonical(),
        })
        .collect()
}

/// Candidate root with its regime-specific distance to the subject
#[derive(Debug, Clone)]
pub struct RootCandidate<'a> {
    pub record: &'a TokenRecord,
    pub canonical: &'a CanonicalIdentity,
    pub distance: usize,
    pub regime: Regime,
}

#[derive(Debug, Clone, Default)]
pub struct ClusterBuilder {
    classifier: SimilarityClassifier,
}

impl ClusterBuilder {
    pub fn new(classifier: SimilarityClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &SimilarityClassifier {
        &self.classifier
    }

    /// Build the cluster the subject belongs to, if any.
    ///
    /// `None` is the normal outcome for a novel identity.
    pub fn build(&self, subject: &ScanSubject, snapshot: &RegistrySnapshot) -> Option<SuspicionCluster> {
        let index = index_snapshot(snapshot);
        let input = subject.canonical();

        let candidates = self.candidate_roots(subject, &input, &index);
        tracing::debug!("{} candidate root(s) for {}", candidates.len(), subject.label());

        let root = candidates.into_iter().next()?;
        tracing::debug!(
            "Root {} selected at distance {} ({:?})",
            root.record.label(),
            root.distance,
            root.regime
        );

        let mut members = self.expand(root.canonical, index.iter());

        if let Some(record) = subject.record() {
            let key = input.key();
            if !members.iter().any(|m| m.canonical.key() == key) {
                members.push(IndexedRecord {
                    record,
                    canonical: input.clone(),
                });
            }
        }

        let closest = self
            .closest_member(root.canonical, &members)
            .map(|m| m.record.clone());

        Some(SuspicionCluster {
            root: root.record.clone(),
            members: members.into_iter().map(|m| m.record.clone()).collect(),
            closest,
            regime: root.regime,
        })
    }

    /// Earlier records the subject is suspicious against, best first.
    ///
    /// Records without a timestamp never qualify as roots. A proposed subject
    /// (or one whose own timestamp is unknown) is compared against every
    /// other record.
    pub fn candidate_roots<'a>(
        &self,
        subject: &ScanSubject,
        input: &CanonicalIdentity,
        index: &'a [IndexedRecord<'a>],
    ) -> Vec<RootCandidate<'a>> {
        let subject_record = subject.record();

        let mut candidates: Vec<RootCandidate<'a>> = index
            .iter()
            .filter(|entry| !entry.record.is_ambiguous())
            .filter(|entry| match subject_record {
                Some(own) if !own.is_ambiguous() => entry.record.registered_at < own.registered_at,
                _ => true,
            })
            .filter(|entry| self.classifier.is_suspicious(input, &entry.canonical))
            .filter_map(|entry| {
                let distance = self.classifier.regime_distance(input, &entry.canonical)?;
                Some(RootCandidate {
                    record: entry.record,
                    canonical: &entry.canonical,
                    distance,
                    regime: self.classifier.regime(input, &entry.canonical),
                })
            })
            .collect();

        // Stable: equal (distance, timestamp) keeps logbook order
        candidates.sort_by_key(|c| (c.distance, c.record.registered_at));
        candidates
    }

    /// Every record suspicious against `root`, one per canonical identity
    pub fn expand<'a, 'b, I>(&self, root: &CanonicalIdentity, records: I) -> Vec<IndexedRecord<'a>>
    where
        'a: 'b,
        I: IntoIterator<Item = &'b IndexedRecord<'a>>,
    {
        let mut seen = HashSet::new();

        records
            .into_iter()
            .filter(|entry| self.classifier.is_suspicious(&entry.canonical, root))
            .filter(|entry| seen.insert(entry.canonical.key()))
            .cloned()
            .collect()
    }

    /// Member nearest to the root, ignoring the root's own identity.
    /// Ties go to the earliest registration; unknown timestamps sort last.
    pub fn closest_member<'m, 'a>(
        &self,
        root: &CanonicalIdentity,
        members: &'m [IndexedRecord<'a>],
    ) -> Option<&'m IndexedRecord<'a>> {
        let root_key = root.key();

        members
            .iter()
            .filter(|m| m.canonical.key() != root_key)
            .min_by_key(|m| {
                let distance = self
                    .classifier
                    .regime_distance(&m.canonical, root)
                    .unwrap_or(usize::MAX);
                (distance, m.record.is_ambiguous(), m.record.registered_at)
            })
    }
}
