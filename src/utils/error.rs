//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to GAPIS
#[derive(Error, Debug)]
pub enum GapisError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid GAPIS endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("Malformed JSON-RPC response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("GAPIS error {code}: {message}")]
    Server { code: i64, message: String },

    #[error("Method not supported by this GAPIS server: {0}")]
    MethodNotSupported(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Session already closed")]
    Closed,
}

/// Errors that can occur while picking a replay device
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("No compatible replay devices found")]
    NoCompatibleDevice,

    #[error("Could not find device matching '{hint}' (available: {available})")]
    NoMatchingDevice { hint: String, available: String },

    #[error("Device hint '{hint}' matches {count} devices")]
    AmbiguousDevice { hint: String, count: usize },

    #[error(transparent)]
    Gapis(#[from] GapisError),
}

/// Fatal outcomes of the `export_replay` verb, annotated with the failing step
#[derive(Error, Debug)]
pub enum ExportReplayError {
    #[error("Failed to connect to the GAPIS server")]
    Connect(#[source] GapisError),

    #[error("Failed to load the capture file")]
    Load(#[source] GapisError),

    #[error("Failed to resolve a replay device")]
    Device(#[source] DeviceError),

    #[error("Failed to export replay")]
    Export(#[source] GapisError),
}
