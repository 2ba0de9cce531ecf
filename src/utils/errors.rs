use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Registry unavailable after {attempts} attempt(s): {reason}")]
    UpstreamUnavailable { attempts: u32, reason: String },

    #[error("RPC error: {0}")]
    RpcError(#[from] ethers::providers::ProviderError),

    #[error("Registry call failed: {0}")]
    ContractCallError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScanError {
    /// Stable discriminator used in response payloads
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::Validation(_) | ScanError::InvalidAddress(_) => "validation",
            ScanError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ScanError::RpcError(_) => "rpc",
            ScanError::ContractCallError(_) => "contract_call",
            ScanError::ConfigError(_) => "config",
            ScanError::JsonError(_) => "json",
            ScanError::IoError(_) => "io",
        }
    }

    /// Errors worth another attempt against the registry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ScanError::RpcError(_) | ScanError::ContractCallError(_) | ScanError::IoError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
