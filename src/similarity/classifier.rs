use serde::{Deserialize, Serialize};

use super::canonical::CanonicalIdentity;
use super::distance::edit_distance;

/// Comparison regime, chosen by the canonical symbol length of both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Both symbols short: name and symbol distances are checked separately
    ShortCode,
    /// Both symbols long: the concatenated name+symbol is compared as one string
    LongSymbol,
    /// One short, one long symbol: never suspicious
    Mixed,
}

/// Edit-distance thresholds for both regimes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityThresholds {
    /// Symbols up to this length use the short-code regime
    pub short_symbol_max_len: usize,
    pub short_code_name_distance: usize,
    pub short_code_symbol_distance: usize,
    pub long_symbol_unified_distance: usize,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self {
            short_symbol_max_len: 3,
            short_code_name_distance: 3,
            short_code_symbol_distance: 2,
            long_symbol_unified_distance: 2,
        }
    }
}

/// Pairwise clone classifier.
///
/// Every check is built from symmetric distances, so swapping the two
/// identities never changes the outcome.
#[derive(Debug, Clone, Default)]
pub struct SimilarityClassifier {
    thresholds: SimilarityThresholds,
}

impl SimilarityClassifier {
    pub fn new(thresholds: SimilarityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn regime(&self, a: &CanonicalIdentity, b: &CanonicalIdentity) -> Regime {
        let max = self.thresholds.short_symbol_max_len;
        match (a.symbol.len() <= max, b.symbol.len() <= max) {
            (true, true) => Regime::ShortCode,
            (false, false) => Regime::LongSymbol,
            _ => Regime::Mixed,
        }
    }

    pub fn is_suspicious(&self, a: &CanonicalIdentity, b: &CanonicalIdentity) -> bool {
        let t = &self.thresholds;
        match self.regime(a, b) {
            Regime::ShortCode => {
                edit_distance(&a.name, &b.name) <= t.short_code_name_distance
                    && edit_distance(&a.symbol, &b.symbol) <= t.short_code_symbol_distance
            }
            Regime::LongSymbol => edit_distance(&a.key(), &b.key()) <= t.long_symbol_unified_distance,
            // Asymmetric symbol lengths are out of scope for both regimes
            Regime::Mixed => false,
        }
    }

    /// Distance used for ranking roots and picking the closest member.
    /// `None` for mixed pairs, which have no comparable distance.
    pub fn regime_distance(&self, a: &CanonicalIdentity, b: &CanonicalIdentity) -> Option<usize> {
        match self.regime(a, b) {
            Regime::ShortCode => Some(edit_distance(&a.name, &b.name) + edit_distance(&a.symbol, &b.symbol)),
            Regime::LongSymbol => Some(edit_distance(&a.key(), &b.key())),
            Regime::Mixed => None,
        }
    }
}
