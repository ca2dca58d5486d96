//! Utility modules for configuration, cancellation, signals, and error handling.

pub mod config;
pub mod context;
pub mod error;
pub mod interrupt;

// Re-export commonly used types for convenience
pub use context::Context;
pub use interrupt::InterruptGuard;
pub use error::{DeviceError, ExportReplayError, GapisError};
