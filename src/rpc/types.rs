//! Types for JSON-RPC communication with GAPIS.

use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON-RPC 2.0 request structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<P> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: P,
    pub id: u64,
}

impl<P: Serialize> JsonRpcRequest<P> {
    pub fn new(method: &'static str, params: P, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id,
        }
    }
}

/// JSON-RPC 2.0 response structure
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    #[serde(default)]
    pub jsonrpc: String,
    /// Null when the server could not read the request id
    pub id: Option<u64>,
    pub result: Option<T>,
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Opaque handle to a capture loaded by GAPIS.
///
/// Only meaningful within the session that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptureRef(pub String);

impl fmt::Display for CaptureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle to a replay device known to GAPIS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceRef(pub String);

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A replay device as reported by `getDevicesForReplay`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceInfo {
    pub id: DeviceRef,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub serial: String,
}

impl DeviceInfo {
    /// True when the hint names this device by serial, name, or id
    pub fn matches(&self, hint: &str) -> bool {
        self.serial == hint || self.name == hint || self.id.0 == hint
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerInfoParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replay_device: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct LoadCaptureParams<'a> {
    pub path: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoadCaptureResult {
    pub capture: CaptureRef,
}

#[derive(Debug, Serialize)]
pub struct DevicesForReplayParams<'a> {
    pub capture: &'a CaptureRef,
}

#[derive(Debug, Deserialize)]
pub struct DevicesForReplayResult {
    #[serde(default)]
    pub devices: Vec<DeviceInfo>,
}

#[derive(Debug, Serialize)]
pub struct ExportReplayParams<'a> {
    pub capture: &'a CaptureRef,
    pub device: &'a DeviceRef,
    pub path: &'a str,
}
