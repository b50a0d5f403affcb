//! Utility modules for error handling, configuration and platform lookup

pub mod config;
pub mod error;
pub mod platform;

// Re-export for convenience
pub use config::ShimSettings;
pub use error::{EngineError, ShimError, Stage};
