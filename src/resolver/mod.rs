//! Resolution of CLI inputs into server-side handles.
//!
//! - Capture: trace path → absolute path → capture handle
//! - Device: capture handle + optional hint → replay device handle

pub mod capture;
pub mod device;

// Re-export main functions
pub use capture::{absolute_capture_path, load_capture};
pub use device::{resolve_device, select_device};
