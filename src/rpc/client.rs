//! HTTP client for communicating with a GAPIS JSON-RPC endpoint.

use super::service::{Connect, Gapis};
use super::types::{
    CaptureRef, DeviceInfo, DeviceRef, DevicesForReplayParams, DevicesForReplayResult,
    ExportReplayParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, LoadCaptureParams,
    LoadCaptureResult, ServerInfo, ServerInfoParams,
};
use crate::utils::config::{
    ConnectionConfig, CANCEL_POLL_INTERVAL, METHOD_DEVICES_FOR_REPLAY, METHOD_EXPORT_REPLAY,
    METHOD_LOAD_CAPTURE, METHOD_SERVER_INFO,
};
use crate::utils::{Context, GapisError};
use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// JSON-RPC client bound to one GAPIS endpoint
pub struct GapisClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
    next_id: AtomicU64,
    closed: bool,
}

impl GapisClient {
    /// Create a client without contacting the server
    pub fn new(config: &ConnectionConfig) -> Result<Self, GapisError> {
        validate_endpoint(&config.gapis)?;

        // Request lifetimes are bounded by the caller's Context only
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(GapisError::RequestFailed)?;

        Ok(Self {
            client,
            endpoint: config.gapis.clone(),
            token: config.token.clone(),
            next_id: AtomicU64::new(1),
            closed: false,
        })
    }

    /// Create a client and verify the server answers
    pub fn connect(ctx: &Context, config: &ConnectionConfig) -> Result<Self, GapisError> {
        let client = Self::new(config)?;

        let params = ServerInfoParams {
            replay_device: config.gapir_device.as_deref(),
        };
        let server: ServerInfo = client.call(ctx, METHOD_SERVER_INFO, &params)?;
        info!(
            "Connected to {} {} at {}",
            server.name, server.version, client.endpoint
        );

        Ok(client)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue a call whose result must be present
    fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        ctx: &Context,
        method: &'static str,
        params: &P,
    ) -> Result<R, GapisError> {
        self.call_optional(ctx, method, params)?.ok_or_else(|| {
            GapisError::InvalidResponse(format!("Missing result field in {} response", method))
        })
    }

    /// Issue a call, accepting a null or missing result
    fn call_optional<P: Serialize, R: DeserializeOwned>(
        &self,
        ctx: &Context,
        method: &'static str,
        params: &P,
    ) -> Result<Option<R>, GapisError> {
        if self.closed {
            return Err(GapisError::Closed);
        }
        ctx.check()?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(method, params, id);

        debug!(
            "RPC request: {}",
            serde_json::to_string(&request).unwrap_or_else(|_| method.to_string())
        );

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(left) = ctx.remaining() {
            builder = builder.timeout(left);
        }

        let (status, body) = send_observed(ctx, builder)?;

        // Check HTTP status
        if !status.is_success() {
            return Err(GapisError::InvalidResponse(format!(
                "HTTP {}: {}",
                status,
                String::from_utf8_lossy(&body)
            )));
        }

        // Parse JSON-RPC response
        let rpc_response: JsonRpcResponse<R> = serde_json::from_slice(&body)?;

        // Handle JSON-RPC error
        if let Some(error) = rpc_response.error {
            return Err(map_rpc_error(error, method));
        }

        // A cancellation that raced the request still wins
        if ctx.is_cancelled() {
            return Err(GapisError::Cancelled);
        }

        Ok(rpc_response.result)
    }
}

impl Gapis for GapisClient {
    fn load_capture(&self, ctx: &Context, path: &Path) -> Result<CaptureRef, GapisError> {
        let path = utf8_path(path)?;
        info!("Loading capture: {}", path);

        let result: LoadCaptureResult =
            self.call(ctx, METHOD_LOAD_CAPTURE, &LoadCaptureParams { path })?;
        debug!("Capture handle: {}", result.capture);

        Ok(result.capture)
    }

    fn devices_for_replay(
        &self,
        ctx: &Context,
        capture: &CaptureRef,
    ) -> Result<Vec<DeviceInfo>, GapisError> {
        let result: DevicesForReplayResult = self.call(
            ctx,
            METHOD_DEVICES_FOR_REPLAY,
            &DevicesForReplayParams { capture },
        )?;
        debug!("{} replay device(s) offered", result.devices.len());

        Ok(result.devices)
    }

    fn export_replay(
        &self,
        ctx: &Context,
        capture: &CaptureRef,
        device: &DeviceRef,
        out: &Path,
    ) -> Result<(), GapisError> {
        let params = ExportReplayParams {
            capture,
            device,
            path: utf8_path(out)?,
        };
        let _: Option<serde_json::Value> =
            self.call_optional(ctx, METHOD_EXPORT_REPLAY, &params)?;

        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            debug!("Closing GAPIS client for {}", self.endpoint);
            self.closed = true;
        }
    }
}

/// Opens `GapisClient` sessions over HTTP
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

impl Connect for HttpConnector {
    type Client = GapisClient;

    fn connect(
        &self,
        ctx: &Context,
        config: &ConnectionConfig,
    ) -> Result<GapisClient, GapisError> {
        GapisClient::connect(ctx, config)
    }
}

/// Send on a worker thread and wait in short slices so that cancellation
/// and the deadline are noticed while the server is still silent.
///
/// A worker abandoned this way finishes on its own once the request ends.
fn send_observed(
    ctx: &Context,
    builder: RequestBuilder,
) -> Result<(StatusCode, Vec<u8>), GapisError> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = builder.send().and_then(|response| {
            let status = response.status();
            response.bytes().map(|body| (status, body.to_vec()))
        });
        let _ = tx.send(result);
    });

    loop {
        match rx.recv_timeout(CANCEL_POLL_INTERVAL) {
            Ok(result) => {
                return result.map_err(|e| {
                    if e.is_timeout() && ctx.deadline().is_some() {
                        GapisError::DeadlineExceeded
                    } else {
                        GapisError::RequestFailed(e)
                    }
                })
            }
            Err(RecvTimeoutError::Timeout) => ctx.check()?,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(GapisError::InvalidResponse(
                    "request worker exited without a reply".to_string(),
                ))
            }
        }
    }
}

/// Paths travel as JSON strings, so they must be UTF-8
fn utf8_path(path: &Path) -> Result<&str, GapisError> {
    path.to_str()
        .ok_or_else(|| GapisError::NonUtf8Path(path.to_path_buf()))
}

/// Reject endpoints that are not HTTP(S) URLs
pub fn validate_endpoint(endpoint: &str) -> Result<(), GapisError> {
    if endpoint.is_empty() {
        return Err(GapisError::InvalidEndpoint(
            "GAPIS endpoint cannot be empty".to_string(),
        ));
    }

    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(GapisError::InvalidEndpoint(format!(
            "{} (must start with http:// or https://)",
            endpoint
        )));
    }

    Ok(())
}

/// Map JSON-RPC error to our error type
fn map_rpc_error(error: JsonRpcError, method: &str) -> GapisError {
    match error.code {
        -32601 => GapisError::MethodNotSupported(method.to_string()),
        code => GapisError::Server {
            code,
            message: error.message,
        },
    }
}
