//! Error information-disclosure tests.
//!
//! `Error::into_response` forwards the `Display` output of client errors to
//! the caller, but server-error variants must be scrubbed to a generic
//! message.

use paddock::Error;

fn body_of(err: Error) -> String {
    let resp = err.into_response();
    let bytes = tokio_test::block_on(http_body_util::BodyExt::collect(resp.into_body()))
        .unwrap()
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[test]
fn internal_error_payload_is_scrubbed() {
    let body = body_of(Error::Internal(
        "store poisoned at /srv/paddock/state.rs:42".into(),
    ));
    assert!(!body.contains("state.rs"), "internals leaked: {body}");
    assert!(body.contains("Internal server error"), "got: {body}");
}

#[test]
fn io_error_paths_are_scrubbed() {
    let io_err = std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "No such file: /etc/paddock/seed.toml",
    );
    let body = body_of(Error::Io(io_err));
    assert!(!body.contains("/etc/paddock"), "path leaked: {body}");
    assert!(body.contains("Internal server error"), "got: {body}");
}

#[test]
fn conflict_messages_reach_the_client() {
    let body = body_of(Error::Conflict("role is in use by 2 user(s)".into()));
    assert!(body.contains("role is in use"), "got: {body}");
}

#[test]
fn stale_config_reports_both_versions() {
    let err = Error::StaleConfig {
        expected: 4,
        found: 7,
    };
    assert_eq!(err.status_code(), hyper::StatusCode::CONFLICT);
    let body = body_of(err);
    assert!(body.contains('4') && body.contains('7'), "got: {body}");
}

#[test]
fn too_many_requests_sets_retry_after() {
    let err = Error::TooManyRequests { retry_after: 12 };
    assert_eq!(err.status_code(), hyper::StatusCode::TOO_MANY_REQUESTS);
    let resp = err.into_response();
    assert_eq!(resp.headers().get("Retry-After").unwrap(), "12");
}
