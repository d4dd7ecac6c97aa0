pub mod client;
pub mod entry;
pub mod error;
pub mod state;

// Re-export error types for convenience
pub use error::{Error, Result};
