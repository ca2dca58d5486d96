//! Configuration and constants for the CLI.

use std::path::PathBuf;
use std::time::Duration;

/// Default GAPIS endpoint when neither `--gapis` nor `GAPIS_ENDPOINT` is set
pub const DEFAULT_GAPIS_ENDPOINT: &str = "http://localhost:40000";

/// Default destination for exported replay artifacts
pub const DEFAULT_EXPORT_DIR: &str = "replay_export";

/// How often a pending request checks for cancellation
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

// JSON-RPC method names understood by GAPIS
pub const METHOD_SERVER_INFO: &str = "getServerInfo";
pub const METHOD_LOAD_CAPTURE: &str = "loadCapture";
pub const METHOD_DEVICES_FOR_REPLAY: &str = "getDevicesForReplay";
pub const METHOD_EXPORT_REPLAY: &str = "exportReplay";

/// Parameters used to open a session with GAPIS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// GAPIS endpoint URL
    pub gapis: String,

    /// Optional auth token, sent as a bearer credential
    pub token: Option<String>,

    /// Serial (or name) of the replay device to target
    pub gapir_device: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            gapis: DEFAULT_GAPIS_ENDPOINT.to_string(),
            token: None,
            gapir_device: None,
        }
    }
}

/// Default export destination as a path
pub fn default_export_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_DIR)
}
