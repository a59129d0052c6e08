pub mod cidr;
pub mod designer;
pub mod error;
pub mod interface;

// Re-export commonly used types
pub use designer::{FilterSpec, Frontend, HostBackend};
pub use error::{DesignError, Result};
pub use interface::{BackendKind, NicConfig};
