use async_trait::async_trait;
use ethers::types::Address;

use crate::models::{RegistrySnapshot, TrustLevel};
use crate::utils::Result;

/// Core abstraction: anything that can hand out a frozen registry logbook
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &'static str;

    /// Read the full logbook in append order
    async fn logbook(&self) -> Result<RegistrySnapshot>;

    /// Per-token trust level lookup
    async fn trust_level(&self, token: Address) -> Result<TrustLevel>;
}
