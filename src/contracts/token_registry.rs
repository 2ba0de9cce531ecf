//! Token registry interface
//! Read-only view of the permissioned registry's logbook
use ethers::prelude::*;
// Generate contract bindings using abigen macro
abigen!(
    ITokenRegistry,
    r#"[
        struct LogbookEntry { string name; string symbol; address token; address registeredBy; uint256 timestamp; uint8 trustLevel; }
        function getLogbook() external view returns (LogbookEntry[])
        function getTrustLevel(address token) external view returns (uint8)
    ]"#,
);
