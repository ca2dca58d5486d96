//! The GAPIS operations the CLI depends on.
//!
//! `Connect` opens a session; `Gapis` is what an open session can do.
//! The HTTP client implements both; tests substitute scripted services.

use super::types::{CaptureRef, DeviceInfo, DeviceRef};
use crate::utils::config::ConnectionConfig;
use crate::utils::{Context, GapisError};
use std::path::Path;

/// Operations available on an open GAPIS session
pub trait Gapis {
    /// Load a capture file and return its server-side handle
    fn load_capture(&self, ctx: &Context, path: &Path) -> Result<CaptureRef, GapisError>;

    /// Devices able to replay `capture`, most preferred first
    fn devices_for_replay(
        &self,
        ctx: &Context,
        capture: &CaptureRef,
    ) -> Result<Vec<DeviceInfo>, GapisError>;

    /// Ask the service to write replay instructions and assets to `out`
    fn export_replay(
        &self,
        ctx: &Context,
        capture: &CaptureRef,
        device: &DeviceRef,
        out: &Path,
    ) -> Result<(), GapisError>;

    /// Release the connection. Calls made afterwards fail with `Closed`.
    fn close(&mut self);
}

/// Something that can open a GAPIS session
pub trait Connect {
    type Client: Gapis;

    fn connect(&self, ctx: &Context, config: &ConnectionConfig)
        -> Result<Self::Client, GapisError>;
}
