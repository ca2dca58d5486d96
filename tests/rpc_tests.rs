use gapit::commands::{execute_export_replay, ExportReplayArgs, Outcome};
use gapit::rpc::{CaptureRef, DeviceRef, Gapis, GapisClient, HttpConnector};
use gapit::utils::config::ConnectionConfig;
use gapit::utils::{Context, ExportReplayError, GapisError};
use mockito::{Matcher, Server, ServerGuard};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

fn config_for(server: &ServerGuard) -> ConnectionConfig {
    ConnectionConfig {
        gapis: server.url(),
        ..Default::default()
    }
}

fn rpc_result(result: serde_json::Value) -> String {
    json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string()
}

fn rpc_error(code: i64, message: &str) -> String {
    json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": code, "message": message } })
        .to_string()
}

fn mock_method(
    server: &mut ServerGuard,
    method: &str,
    body: String,
) -> mockito::Mock {
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "jsonrpc": "2.0", "method": method })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}

fn mock_handshake(server: &mut ServerGuard) -> mockito::Mock {
    mock_method(
        server,
        "getServerInfo",
        rpc_result(json!({ "name": "gapis", "version": "1.6.0" })),
    )
}

#[test]
fn test_connect_performs_handshake() {
    let mut server = Server::new();
    let handshake = mock_handshake(&mut server);

    let client = GapisClient::connect(&Context::new(), &config_for(&server)).unwrap();

    handshake.assert();
    assert_eq!(client.endpoint(), server.url());
}

#[test]
fn test_connect_forwards_replay_device() {
    let mut server = Server::new();
    let handshake = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "getServerInfo",
            "params": { "replay_device": "28041FDH" }
        })))
        .with_status(200)
        .with_body(rpc_result(json!({ "name": "gapis" })))
        .create();

    let config = ConnectionConfig {
        gapir_device: Some("28041FDH".to_string()),
        ..config_for(&server)
    };
    GapisClient::connect(&Context::new(), &config).unwrap();

    handshake.assert();
}

#[test]
fn test_connect_refused() {
    let config = ConnectionConfig {
        gapis: "http://127.0.0.1:1".to_string(),
        ..Default::default()
    };

    let result = GapisClient::connect(&Context::new(), &config);

    assert!(matches!(result, Err(GapisError::RequestFailed(_))));
}

#[test]
fn test_invalid_endpoint_is_rejected_before_any_request() {
    let config = ConnectionConfig {
        gapis: "localhost:40000".to_string(),
        ..Default::default()
    };

    assert!(matches!(
        GapisClient::connect(&Context::new(), &config),
        Err(GapisError::InvalidEndpoint(_))
    ));
}

#[test]
fn test_token_sent_as_bearer() {
    let mut server = Server::new();
    let handshake = server
        .mock("POST", "/")
        .match_header("authorization", "Bearer s3cret")
        .with_status(200)
        .with_body(rpc_result(json!({ "name": "gapis" })))
        .create();

    let config = ConnectionConfig {
        token: Some("s3cret".to_string()),
        ..config_for(&server)
    };
    GapisClient::connect(&Context::new(), &config).unwrap();

    handshake.assert();
}

#[test]
fn test_load_capture() {
    let mut server = Server::new();
    let load = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "loadCapture",
            "params": { "path": "/traces/frame.gfxtrace" }
        })))
        .with_status(200)
        .with_body(rpc_result(json!({ "capture": "capture-7" })))
        .create();

    let client = GapisClient::new(&config_for(&server)).unwrap();
    let capture = client
        .load_capture(&Context::new(), Path::new("/traces/frame.gfxtrace"))
        .unwrap();

    load.assert();
    assert_eq!(capture, CaptureRef("capture-7".to_string()));
}

#[test]
fn test_load_capture_server_error() {
    let mut server = Server::new();
    mock_method(
        &mut server,
        "loadCapture",
        rpc_error(-32000, "file not found"),
    );

    let client = GapisClient::new(&config_for(&server)).unwrap();
    let err = client
        .load_capture(&Context::new(), Path::new("missing.gfxtrace"))
        .unwrap_err();

    match err {
        GapisError::Server { code, message } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "file not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_error_reply_with_null_id() {
    let mut server = Server::new();
    mock_method(
        &mut server,
        "loadCapture",
        json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": { "code": -32700, "message": "Parse error" }
        })
        .to_string(),
    );

    let client = GapisClient::new(&config_for(&server)).unwrap();
    let err = client
        .load_capture(&Context::new(), Path::new("a.gfxtrace"))
        .unwrap_err();

    assert!(matches!(err, GapisError::Server { code: -32700, .. }));
}

#[test]
fn test_non_json_body_is_malformed() {
    let mut server = Server::new();
    mock_method(&mut server, "loadCapture", "<html>proxy</html>".to_string());

    let client = GapisClient::new(&config_for(&server)).unwrap();
    let err = client
        .load_capture(&Context::new(), Path::new("a.gfxtrace"))
        .unwrap_err();

    assert!(matches!(err, GapisError::MalformedResponse(_)));
}

/// A listener that accepts connections into its backlog and never answers
fn silent_server() -> (TcpListener, ConnectionConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let config = ConnectionConfig {
        gapis: format!("http://{}", listener.local_addr().unwrap()),
        ..Default::default()
    };
    (listener, config)
}

#[test]
fn test_deadline_expires_while_request_is_pending() {
    let (_listener, config) = silent_server();
    let client = GapisClient::new(&config).unwrap();
    let ctx = Context::new().with_timeout(Duration::from_millis(300));

    let start = Instant::now();
    let err = client
        .load_capture(&ctx, Path::new("a.gfxtrace"))
        .unwrap_err();

    assert!(matches!(err, GapisError::DeadlineExceeded), "{:?}", err);
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[test]
fn test_cancel_interrupts_pending_request() {
    let (_listener, config) = silent_server();
    let client = GapisClient::new(&config).unwrap();
    let ctx = Context::new().with_timeout(Duration::from_secs(30));

    let canceller = ctx.clone();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        canceller.cancel();
    });

    let start = Instant::now();
    let err = client
        .load_capture(&ctx, Path::new("a.gfxtrace"))
        .unwrap_err();

    assert!(matches!(err, GapisError::Cancelled), "{:?}", err);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_cancel_during_handshake_is_connect_error() {
    let (_listener, config) = silent_server();
    let ctx = Context::new();

    let canceller = ctx.clone();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        canceller.cancel();
    });

    let args = ExportReplayArgs {
        traces: vec![PathBuf::from("trace.gfxtrace")],
        connection: config,
        ..Default::default()
    };
    let err = execute_export_replay(&ctx, &HttpConnector, &args).unwrap_err();

    assert!(matches!(err, ExportReplayError::Connect(GapisError::Cancelled)));
}

#[test]
fn test_missing_result_is_invalid() {
    let mut server = Server::new();
    mock_method(&mut server, "loadCapture", json!({ "jsonrpc": "2.0", "id": 1 }).to_string());

    let client = GapisClient::new(&config_for(&server)).unwrap();
    let err = client
        .load_capture(&Context::new(), Path::new("a.gfxtrace"))
        .unwrap_err();

    assert!(matches!(err, GapisError::InvalidResponse(_)));
}

#[test]
fn test_http_status_failure() {
    let mut server = Server::new();
    server
        .mock("POST", "/")
        .with_status(503)
        .with_body("overloaded")
        .create();

    let client = GapisClient::new(&config_for(&server)).unwrap();
    let err = client
        .load_capture(&Context::new(), Path::new("a.gfxtrace"))
        .unwrap_err();

    match err {
        GapisError::InvalidResponse(message) => assert!(message.contains("503")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_devices_for_replay() {
    let mut server = Server::new();
    mock_method(
        &mut server,
        "getDevicesForReplay",
        rpc_result(json!({
            "devices": [
                { "id": "dev-1", "name": "host", "serial": "" },
                { "id": "dev-2", "name": "Pixel 7", "serial": "28041FDH" }
            ]
        })),
    );

    let client = GapisClient::new(&config_for(&server)).unwrap();
    let devices = client
        .devices_for_replay(&Context::new(), &CaptureRef("capture-7".to_string()))
        .unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[1].id, DeviceRef("dev-2".to_string()));
    assert_eq!(devices[1].serial, "28041FDH");
}

#[test]
fn test_export_replay_accepts_null_result() {
    let mut server = Server::new();
    let export = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "exportReplay",
            "params": { "capture": "capture-7", "device": "dev-2", "path": "replay_export" }
        })))
        .with_status(200)
        .with_body(rpc_result(serde_json::Value::Null))
        .create();

    let client = GapisClient::new(&config_for(&server)).unwrap();
    client
        .export_replay(
            &Context::new(),
            &CaptureRef("capture-7".to_string()),
            &DeviceRef("dev-2".to_string()),
            Path::new("replay_export"),
        )
        .unwrap();

    export.assert();
}

#[test]
fn test_export_replay_unsupported() {
    let mut server = Server::new();
    mock_method(&mut server, "exportReplay", rpc_error(-32601, "Method not found"));

    let client = GapisClient::new(&config_for(&server)).unwrap();
    let err = client
        .export_replay(
            &Context::new(),
            &CaptureRef("capture-7".to_string()),
            &DeviceRef("dev-2".to_string()),
            Path::new("replay_export"),
        )
        .unwrap_err();

    assert!(matches!(err, GapisError::MethodNotSupported(_)));
}

#[test]
fn test_cancelled_context_sends_nothing() {
    let mut server = Server::new();
    let any = server.mock("POST", "/").expect(0).create();

    let ctx = Context::new();
    ctx.cancel();

    let client = GapisClient::new(&config_for(&server)).unwrap();
    let err = client
        .load_capture(&ctx, Path::new("a.gfxtrace"))
        .unwrap_err();

    any.assert();
    assert!(matches!(err, GapisError::Cancelled));
}

#[test]
fn test_full_export_over_http() {
    let mut server = Server::new();
    let mocks = vec![
        mock_handshake(&mut server),
        mock_method(
            &mut server,
            "loadCapture",
            rpc_result(json!({ "capture": "capture-7" })),
        ),
        mock_method(
            &mut server,
            "getDevicesForReplay",
            rpc_result(json!({ "devices": [{ "id": "dev-1", "name": "host" }] })),
        ),
        mock_method(&mut server, "exportReplay", rpc_result(json!({}))),
    ];

    let args = ExportReplayArgs {
        traces: vec![PathBuf::from("trace.gfxtrace")],
        connection: config_for(&server),
        out: PathBuf::from("exported"),
    };
    let outcome = execute_export_replay(&Context::new(), &HttpConnector, &args).unwrap();

    for mock in &mocks {
        mock.assert();
    }
    assert_eq!(
        outcome,
        Outcome::Exported {
            destination: PathBuf::from("exported")
        }
    );
}

#[test]
fn test_unreachable_server_is_connect_error() {
    let args = ExportReplayArgs {
        traces: vec![PathBuf::from("trace.gfxtrace")],
        connection: ConnectionConfig {
            gapis: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    let err = execute_export_replay(&Context::new(), &HttpConnector, &args).unwrap_err();

    assert!(matches!(err, ExportReplayError::Connect(_)));
}
