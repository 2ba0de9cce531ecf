mod errors;

pub use errors::{Result, ScanError};
