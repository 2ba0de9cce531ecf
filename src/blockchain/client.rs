use ethers::prelude::*;
use std::sync::Arc;
use crate::utils::{Result, ScanError};

/// Blockchain RPC client
pub struct BlockchainClient {
    pub(crate) provider: Arc<Provider<Http>>,
    chain_id: u64,
}

impl BlockchainClient {
    /// Create a new client
    pub async fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ScanError::RpcError(
                ProviderError::CustomError(format!("Invalid RPC URL: {}", e))
            ))?;

        let provider = Arc::new(provider);

        // Get chain ID
        let chain_id = provider.get_chainid().await?;

        tracing::info!("Connected to chain ID: {}", chain_id);

        Ok(Self {
            provider,
            chain_id: chain_id.as_u64(),
        })
    }

    /// Get current block number
    pub async fn block_number(&self) -> Result<u64> {
        let block = self.provider.get_block_number().await?;
        Ok(block.as_u64())
    }

    /// Check that a registry contract is deployed at the address
    pub async fn is_contract(&self, address: Address) -> Result<bool> {
        let code = self.provider.get_code(address, None).await?;
        Ok(!code.is_empty())
    }

    /// Get chain name
    pub fn chain_name(&self) -> &'static str {
        chain_name(self.chain_id)
    }
}

pub fn chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "Ethereum Mainnet",
        369 => "PulseChain",
        943 => "PulseChain Testnet",
        11155111 => "Sepolia",
        31337 => "Local Devnet",
        _ => "Unknown Chain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_names() {
        assert_eq!(chain_name(1), "Ethereum Mainnet");
        assert_eq!(chain_name(369), "PulseChain");
        assert_eq!(chain_name(424242), "Unknown Chain");
    }

    #[tokio::test]
    async fn test_rejects_malformed_rpc_url() {
        let result = BlockchainClient::new("not a url").await;
        assert!(matches!(result, Err(ScanError::RpcError(_))));
    }
}
