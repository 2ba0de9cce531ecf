use serde::{Deserialize, Serialize};

use crate::models::{SuspicionCluster, TrustLevel};
use crate::similarity::{CanonicalIdentity, Regime};

pub const MAXIMUM_TRUST: &str = "maximum trust, audited & exchange-verified";
pub const EXCHANGE_VERIFIED: &str = "exchange verified, high trust";
pub const ROOT_TOKEN: &str = "root token, no suspicion found";
pub const CAUTION: &str = "caution, investigate history";
pub const INVESTIGATE_LINEAGE: &str = "investigate lineage before trusting";

pub const CREATOR_TRUSTWORTHY: &str = "trustworthy";
pub const CREATOR_MODERATE_RISK: &str = "moderate risk";
pub const CREATOR_HIGH_RISK: &str = "high risk";

/// Bonuses and penalties applied on top of the base score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub base_score: i32,
    /// Indexed by trust level 0..=3
    pub trust_bonuses: [i32; 4],
    pub short_code_penalty: i32,
    pub long_symbol_penalty: i32,
    /// Deducted from a creator's score per cloned token
    pub clone_penalty: i32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_score: 50,
            trust_bonuses: [0, 10, 40, 50],
            short_code_penalty: 10,
            long_symbol_penalty: 25,
            clone_penalty: 10,
        }
    }
}

/// Outcome of scoring one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAssessment {
    pub score: u8,
    /// No cluster, or the token is the cluster root itself
    pub is_base: bool,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct TrustScorer {
    policy: ScoringPolicy,
}

impl TrustScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn trust_bonus(&self, level: TrustLevel) -> i32 {
        self.policy.trust_bonuses[level.as_u8() as usize]
    }

    fn penalty(&self, regime: Regime) -> i32 {
        match regime {
            Regime::ShortCode => self.policy.short_code_penalty,
            Regime::LongSymbol => self.policy.long_symbol_penalty,
            Regime::Mixed => 0,
        }
    }

    pub fn assess(
        &self,
        level: TrustLevel,
        input: &CanonicalIdentity,
        cluster: Option<&SuspicionCluster>,
    ) -> TrustAssessment {
        let is_base = match cluster {
            None => true,
            Some(cluster) => cluster.root.canonical().key() == input.key(),
        };

        let mut score = self.policy.base_score.saturating_add(self.trust_bonus(level));
        if !is_base {
            if let Some(cluster) = cluster {
                score = score.saturating_sub(self.penalty(cluster.regime));
            }
        }
        let score = score.clamp(0, 100) as u8;

        TrustAssessment {
            score,
            is_base,
            recommendation: Self::recommendation(score, is_base, cluster.is_none()),
        }
    }

    /// Label by exact score value; anything unmatched falls through to the
    /// lineage warning
    pub fn recommendation(score: u8, is_base: bool, no_cluster: bool) -> &'static str {
        match score {
            100 => MAXIMUM_TRUST,
            90 => EXCHANGE_VERIFIED,
            60 if is_base && no_cluster => ROOT_TOKEN,
            50 => CAUTION,
            _ => INVESTIGATE_LINEAGE,
        }
    }

    /// Creator score from the number of their tokens flagged as clones
    pub fn creator_score(&self, suspicious_count: usize) -> u8 {
        let count = i32::try_from(suspicious_count).unwrap_or(i32::MAX);
        let deduction = count.saturating_mul(self.policy.clone_penalty);
        100i32.saturating_sub(deduction).clamp(0, 100) as u8
    }

    pub fn creator_recommendation(score: u8) -> &'static str {
        match score {
            90..=u8::MAX => CREATOR_TRUSTWORTHY,
            60..=89 => CREATOR_MODERATE_RISK,
            _ => CREATOR_HIGH_RISK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenRecord;
    use ethers::types::Address;

    const LEVELS: [TrustLevel; 4] = [
        TrustLevel::Unverified,
        TrustLevel::Registered,
        TrustLevel::ExchangeVerified,
        TrustLevel::Audited,
    ];

    fn cluster_rooted_at(name: &str, symbol: &str, regime: Regime) -> SuspicionCluster {
        let root = TokenRecord {
            name: name.to_string(),
            symbol: symbol.to_string(),
            address: Address::from_low_u64_be(1),
            creator: Address::from_low_u64_be(2),
            registered_at: 100,
            trust_level: TrustLevel::Unverified,
            logbook_index: 0,
        };
        SuspicionCluster {
            root: root.clone(),
            members: vec![root],
            closest: None,
            regime,
        }
    }

    #[test]
    fn test_base_scores() {
        let scorer = TrustScorer::default();
        let input = CanonicalIdentity::new("Novel", "NOV");

        let expected = [(50, CAUTION), (60, ROOT_TOKEN), (90, EXCHANGE_VERIFIED), (100, MAXIMUM_TRUST)];
        for (level, (score, label)) in LEVELS.into_iter().zip(expected) {
            let assessment = scorer.assess(level, &input, None);
            assert!(assessment.is_base);
            assert_eq!(assessment.score, score);
            assert_eq!(assessment.recommendation, label);
        }
    }

    #[test]
    fn test_clone_penalties() {
        let scorer = TrustScorer::default();
        let short = cluster_rooted_at("AlphaCoin", "ALP", Regime::ShortCode);
        let long = cluster_rooted_at("Ethereum", "WETH", Regime::LongSymbol);

        let clone = CanonicalIdentity::new("AlphaCoinn", "ALP");
        let assessment = scorer.assess(TrustLevel::Unverified, &clone, Some(&short));
        assert!(!assessment.is_base);
        assert_eq!(assessment.score, 40);
        assert_eq!(assessment.recommendation, INVESTIGATE_LINEAGE);

        let clone = CanonicalIdentity::new("Eth3reum", "WETH");
        let assessment = scorer.assess(TrustLevel::ExchangeVerified, &clone, Some(&long));
        assert_eq!(assessment.score, 65);

        // Audited clone lands on 90 and inherits the exchange-verified label
        let clone = CanonicalIdentity::new("AlphaCoinn", "ALP");
        let assessment = scorer.assess(TrustLevel::Audited, &clone, Some(&short));
        assert_eq!(assessment.score, 90);
        assert_eq!(assessment.recommendation, EXCHANGE_VERIFIED);
    }

    #[test]
    fn test_root_of_cluster_is_base_without_root_label() {
        let scorer = TrustScorer::default();
        let cluster = cluster_rooted_at("AlphaCoin", "ALP", Regime::ShortCode);
        let root = CanonicalIdentity::new("Alpha Coin", "alp");

        let assessment = scorer.assess(TrustLevel::Registered, &root, Some(&cluster));
        assert!(assessment.is_base);
        assert_eq!(assessment.score, 60);
        assert_eq!(assessment.recommendation, INVESTIGATE_LINEAGE);
    }

    #[test]
    fn test_score_always_in_range() {
        let scorer = TrustScorer::default();
        let short = cluster_rooted_at("AlphaCoin", "ALP", Regime::ShortCode);
        let long = cluster_rooted_at("Ethereum", "WETH", Regime::LongSymbol);
        let input = CanonicalIdentity::new("Other", "OTH");

        for level in LEVELS {
            for cluster in [None, Some(&short), Some(&long)] {
                assert!(scorer.assess(level, &input, cluster).score <= 100);
            }
        }

        let harsh = TrustScorer::new(ScoringPolicy {
            long_symbol_penalty: 500,
            ..ScoringPolicy::default()
        });
        assert_eq!(harsh.assess(TrustLevel::Unverified, &input, Some(&long)).score, 0);
    }

    #[test]
    fn test_extreme_policy_saturates() {
        let short = cluster_rooted_at("AlphaCoin", "ALP", Regime::ShortCode);
        let clone = CanonicalIdentity::new("AlphaCoinn", "ALP");

        let generous = TrustScorer::new(ScoringPolicy {
            base_score: i32::MAX,
            trust_bonuses: [i32::MAX; 4],
            ..ScoringPolicy::default()
        });
        assert_eq!(generous.assess(TrustLevel::Audited, &clone, None).score, 100);

        let hostile = TrustScorer::new(ScoringPolicy {
            base_score: i32::MIN,
            short_code_penalty: i32::MAX,
            ..ScoringPolicy::default()
        });
        assert_eq!(hostile.assess(TrustLevel::Unverified, &clone, Some(&short)).score, 0);
    }

    #[test]
    fn test_creator_buckets() {
        let scorer = TrustScorer::default();

        assert_eq!(scorer.creator_score(0), 100);
        assert_eq!(scorer.creator_score(1), 90);
        assert_eq!(scorer.creator_score(4), 60);
        assert_eq!(scorer.creator_score(12), 0);

        assert_eq!(TrustScorer::creator_recommendation(90), CREATOR_TRUSTWORTHY);
        assert_eq!(TrustScorer::creator_recommendation(60), CREATOR_MODERATE_RISK);
        assert_eq!(TrustScorer::creator_recommendation(50), CREATOR_HIGH_RISK);
    }
}
