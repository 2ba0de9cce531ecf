pub mod traits;
pub mod scanner;

pub use traits::RegistrySource;
pub use scanner::RegistryScanner;
