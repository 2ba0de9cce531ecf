//! Contract interfaces for the token registry
//!
//! The registry exposes its full logbook through one bulk call, so snapshots
//! never probe entries index by index.
pub mod token_registry;
pub use token_registry::{ITokenRegistry, LogbookEntry};
