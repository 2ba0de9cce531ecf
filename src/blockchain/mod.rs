mod client;
mod registry;

pub use client::{chain_name, BlockchainClient};
pub use registry::OnChainRegistry;
