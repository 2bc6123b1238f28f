//! Shared harness: starts a real server on a random port and speaks raw
//! HTTP/1.1 over TCP, asserting only on observable behavior.

mod error_disclosure;
mod permissions;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use paddock::config::{Config, Limits, Server as ServerConfig};
use paddock::server::Server;
use paddock::{AccessModule, AccessStore, Module, Router};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Start a test server with default limits and an empty store (built-in
/// Administrator role only).
pub async fn start_access_server() -> (Server, Arc<AccessStore>) {
    start_access_server_with_limits(Limits::default()).await
}

/// Start a test server with custom limits.
pub async fn start_access_server_with_limits(limits: Limits) -> (Server, Arc<AccessStore>) {
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        limits,
        store: Default::default(),
    };

    let store = Arc::new(AccessStore::new());
    let mut router = Router::new();
    AccessModule::new().routes(&mut router);

    let server = paddock::server::start(config, Arc::clone(&store), router.into_handle())
        .await
        .expect("failed to start test server");
    (server, store)
}

/// Send a raw HTTP/1.1 request with `Connection: close` and read the full
/// response.
pub async fn raw_request(addr: SocketAddr, payload: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.expect("failed to connect");
    stream.write_all(payload).await.expect("failed to write");

    let mut buf = Vec::new();
    let _ = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        stream.read_to_end(&mut buf),
    )
    .await;
    buf
}

/// Send a JSON request and return (status code, parsed JSON body).
pub async fn request(
    addr: SocketAddr,
    method: &str,
    path: &str,
    body: Option<&Value>,
) -> (u16, Value) {
    let payload = match body {
        Some(json) => {
            let body = json.to_string();
            format!(
                "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
        }
        None => {
            format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        }
    };

    let raw = raw_request(addr, payload.as_bytes()).await;
    parse_response(&raw)
}

/// Parse status code and JSON body out of a raw HTTP response.
pub fn parse_response(raw: &[u8]) -> (u16, Value) {
    let text = String::from_utf8_lossy(raw);
    let status = text
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("missing status line in response:\n{text}"));
    let body = text.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("");
    let json = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body.trim()).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Create a role over HTTP and return its id.
pub async fn create_role(addr: SocketAddr, name: &str) -> String {
    let (status, body) = request(
        addr,
        "POST",
        "/api/v1/roles",
        Some(&serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, 201, "create role failed: {body}");
    body["id"].as_str().expect("role id").to_string()
}

/// Create a user over HTTP and return its id.
pub async fn create_user(addr: SocketAddr, name: &str, role: Option<&str>) -> String {
    let payload = match role {
        Some(role) => serde_json::json!({ "name": name, "role": role }),
        None => serde_json::json!({ "name": name }),
    };
    let (status, body) = request(addr, "POST", "/api/v1/users", Some(&payload)).await;
    assert_eq!(status, 201, "create user failed: {body}");
    body["id"].as_str().expect("user id").to_string()
}

/// Toggle a base-matrix grant for a role over HTTP.
pub async fn toggle_grant(
    addr: SocketAddr,
    role_id: &str,
    section: &str,
    level: &str,
    enabled: bool,
) -> (u16, Value) {
    request(
        addr,
        "PUT",
        &format!("/api/v1/roles/{role_id}/grants"),
        Some(&serde_json::json!({
            "section": section,
            "level": level,
            "enabled": enabled,
        })),
    )
    .await
}

/// Fetch a user's effective permissions over HTTP.
pub async fn effective(addr: SocketAddr, user_id: &str) -> Value {
    let (status, body) = request(
        addr,
        "GET",
        &format!("/api/v1/users/{user_id}/permissions"),
        None,
    )
    .await;
    assert_eq!(status, 200, "resolve failed: {body}");
    body
}
