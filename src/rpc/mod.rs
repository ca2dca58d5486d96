//! RPC client for communicating with the GAPIS debugging service.

pub mod client;
pub mod service;
pub mod types;

// Re-export main types
pub use client::{GapisClient, HttpConnector};
pub use service::{Connect, Gapis};
pub use types::{CaptureRef, DeviceInfo, DeviceRef};
