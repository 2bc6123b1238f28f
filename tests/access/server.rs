//! Server infrastructure tests: body limits, routing fallbacks, standard
//! headers, and per-IP rate limiting.

use paddock::config::Limits;

use super::{parse_response, raw_request, request, start_access_server,
    start_access_server_with_limits};

#[tokio::test]
async fn server_rejects_oversized_body() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    // Headers only, declaring a body far beyond the default limit.
    let raw = raw_request(
        addr,
        b"POST /api/v1/roles HTTP/1.1\r\nHost: localhost\r\nContent-Length: 10485760\r\nConnection: close\r\n\r\n",
    )
    .await;
    let (status, _) = parse_response(&raw);

    server.shutdown().await.unwrap();
    assert_eq!(status, 413);
}

#[tokio::test]
async fn configured_body_limit_is_enforced() {
    let (server, _store) = start_access_server_with_limits(Limits {
        max_body_bytes: 64,
        ..Default::default()
    })
    .await;
    let addr = server.addr();

    let long_name = "x".repeat(200);
    let (status, _) = request(
        addr,
        "POST",
        "/api/v1/roles",
        Some(&serde_json::json!({ "name": long_name })),
    )
    .await;

    server.shutdown().await.unwrap();
    assert_eq!(status, 413);
}

#[tokio::test]
async fn unknown_paths_and_methods_are_mapped() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let (status, _) = request(addr, "GET", "/api/v1/nonexistent", None).await;
    assert_eq!(status, 404);

    let (status, _) = request(addr, "DELETE", "/api/v1/sections", None).await;
    assert_eq!(status, 405);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let raw = raw_request(
        addr,
        b"GET /api/v1/sections HTTP/1.1\r\nHost: localhost\r\nOrigin: https://team.example\r\nConnection: close\r\n\r\n",
    )
    .await;
    let text = String::from_utf8_lossy(&raw).to_lowercase();

    server.shutdown().await.unwrap();

    assert!(text.contains("x-content-type-options: nosniff"), "{text}");
    assert!(text.contains("x-frame-options: deny"), "{text}");
    assert!(
        text.contains("access-control-allow-origin: https://team.example"),
        "{text}"
    );
}

#[tokio::test]
async fn rate_limit_returns_429_with_retry_after() {
    let (server, _store) = start_access_server_with_limits(Limits {
        rate_limit_requests: 3,
        rate_limit_window_secs: 60,
        ..Default::default()
    })
    .await;
    let addr = server.addr();

    for _ in 0..3 {
        let (status, _) = request(addr, "GET", "/api/v1/sections", None).await;
        assert_eq!(status, 200);
    }

    let raw = raw_request(
        addr,
        b"GET /api/v1/sections HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    let text = String::from_utf8_lossy(&raw);
    let (status, _) = parse_response(&raw);

    server.shutdown().await.unwrap();

    assert_eq!(status, 429, "{text}");
    assert!(text.to_lowercase().contains("retry-after:"), "{text}");
}

#[tokio::test]
async fn graceful_shutdown_stops_accepting() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let (status, _) = request(addr, "GET", "/api/v1/roles", None).await;
    assert_eq!(status, 200);

    server.shutdown().await.unwrap();

    let connect = tokio::net::TcpStream::connect(addr).await;
    if let Ok(stream) = connect {
        // Accept loop is gone; an established socket gets no response.
        drop(stream);
    }
}
