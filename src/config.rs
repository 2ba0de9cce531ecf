//! Scan configuration
//!
//! Everything has a default matching the registry's published policy; a JSON
//! policy file may override any subset of fields.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::analyzers::ScoringPolicy;
use crate::similarity::SimilarityThresholds;
use crate::utils::{Result, ScanError};

/// Timeout and retry budget for registry reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub timeout_ms: u64,
    /// Delay before the second attempt; doubles after every failure
    pub backoff_ms: u64,
}

impl RetryPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay after the given failed attempt (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout_ms: 15_000,
            backoff_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub similarity: SimilarityThresholds,
    pub scoring: ScoringPolicy,
    pub retry: RetryPolicy,
    /// Number of creators listed in cluster statistics
    pub ranking_limit: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityThresholds::default(),
            scoring: ScoringPolicy::default(),
            retry: RetryPolicy::default(),
            ranking_limit: 10,
        }
    }
}

impl ScanConfig {
    /// Load a policy file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: ScanConfig = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::debug!("Loaded scan policy from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry.attempts == 0 {
            return Err(ScanError::ConfigError("retry.attempts must be at least 1".into()));
        }
        if self.retry.timeout_ms == 0 {
            return Err(ScanError::ConfigError("retry.timeout_ms must be positive".into()));
        }
        if self.scoring.trust_bonuses.iter().any(|b| *b < 0) {
            return Err(ScanError::ConfigError("scoring.trust_bonuses must not be negative".into()));
        }
        Ok(())
    }
}
