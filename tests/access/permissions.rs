//! End-to-end permission resolution: base matrix grants, per-user overrides,
//! and Administrator supremacy, all observed through the HTTP API.

use super::{create_role, create_user, effective, request, start_access_server, toggle_grant};
use serde_json::json;

/// Build the scenario role: Editor with roster {view,edit} and stocks {view}.
async fn editor_role(addr: std::net::SocketAddr) -> String {
    let editor = create_role(addr, "Editor").await;
    for (section, level) in [("roster", "view"), ("roster", "edit"), ("stocks", "view")] {
        let (status, body) = toggle_grant(addr, &editor, section, level, true).await;
        assert_eq!(status, 200, "grant toggle failed: {body}");
    }
    editor
}

#[tokio::test]
async fn base_role_grants_resolve_without_override() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let editor = editor_role(addr).await;
    let user = create_user(addr, "Jo", Some(&editor)).await;

    let perms = effective(addr, &user).await;
    assert_eq!(perms["roster"], json!(["view", "edit"]));
    assert_eq!(perms["stocks"], json!(["view"]));
    // Sections absent from the base matrix resolve to no access.
    assert!(perms.get("scouting").is_none() || perms["scouting"] == json!([]));
    assert!(perms.get("financial").is_none() || perms["financial"] == json!([]));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn override_grants_beyond_the_base_role() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let editor = editor_role(addr).await;
    let user = create_user(addr, "Jo", Some(&editor)).await;

    let (status, _) = request(
        addr,
        "PUT",
        &format!("/api/v1/users/{user}/overrides"),
        Some(&json!({ "section": "stocks", "level": "edit", "enabled": true })),
    )
    .await;
    assert_eq!(status, 200);

    let perms = effective(addr, &user).await;
    assert_eq!(perms["roster"], json!(["view", "edit"]), "inherited");
    assert_eq!(perms["stocks"], json!(["view", "edit"]), "overridden");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn empty_override_revokes_below_the_base_role() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let editor = editor_role(addr).await;
    let user = create_user(addr, "Jo", Some(&editor)).await;

    // Unchecking view leaves an explicit empty entry, which replaces the
    // base {view} — not merges with it.
    let (status, overrides) = request(
        addr,
        "PUT",
        &format!("/api/v1/users/{user}/overrides"),
        Some(&json!({ "section": "stocks", "level": "view", "enabled": false })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(overrides["stocks"], json!([]));

    let perms = effective(addr, &user).await;
    assert_eq!(perms["stocks"], json!([]));
    assert_eq!(perms["roster"], json!(["view", "edit"]));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn clearing_an_override_restores_inheritance() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let editor = editor_role(addr).await;
    let user = create_user(addr, "Jo", Some(&editor)).await;

    request(
        addr,
        "PUT",
        &format!("/api/v1/users/{user}/overrides"),
        Some(&json!({ "section": "stocks", "level": "view", "enabled": false })),
    )
    .await;
    assert_eq!(effective(addr, &user).await["stocks"], json!([]));

    let (status, overrides) = request(
        addr,
        "DELETE",
        &format!("/api/v1/users/{user}/overrides/stocks"),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert!(overrides.get("stocks").is_none());

    // Back to the base role's {view}.
    assert_eq!(effective(addr, &user).await["stocks"], json!(["view"]));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn administrator_has_full_access_despite_overrides() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let (_, body) = request(addr, "GET", "/api/v1/roles", None).await;
    let admin_id = body["roles"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["deletable"] == false)
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let user = create_user(addr, "Boss", Some(&admin_id)).await;

    // A restrictive override exists but is never consulted for Administrator.
    let (status, _) = request(
        addr,
        "PUT",
        &format!("/api/v1/users/{user}/overrides"),
        Some(&json!({ "section": "roster", "level": "view", "enabled": false })),
    )
    .await;
    assert_eq!(status, 200);

    let perms = effective(addr, &user).await;
    for (_section, set) in perms.as_object().unwrap() {
        assert_eq!(set, &json!(["view", "edit"]));
    }
    assert_eq!(perms.as_object().unwrap().len(), 12);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn user_without_a_role_has_no_access() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let user = create_user(addr, "New hire", None).await;
    let perms = effective(addr, &user).await;
    assert!(perms.as_object().unwrap().is_empty());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn edit_toggle_cascades_to_view_over_http() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let role = create_role(addr, "Scout").await;
    let (status, body) = toggle_grant(addr, &role, "scouting", "edit", true).await;
    assert_eq!(status, 200);
    assert_eq!(body["grants"]["scouting"], json!(["view", "edit"]));

    // Unchecking view drags edit down with it.
    let (status, body) = toggle_grant(addr, &role, "scouting", "view", false).await;
    assert_eq!(status, 200);
    assert_eq!(body["grants"]["scouting"], json!([]));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn sections_listing_marks_event_detail_as_hidden() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let (status, body) = request(addr, "GET", "/api/v1/sections", None).await;
    assert_eq!(status, 200);

    let sections = body.as_array().unwrap();
    assert_eq!(sections.len(), 12);

    let event_detail = sections
        .iter()
        .find(|s| s["id"] == "event-detail")
        .expect("event-detail section");
    assert_eq!(event_detail["in_permission_ui"], false);
    assert_eq!(event_detail["category"], "general-data");

    let hidden = sections
        .iter()
        .filter(|s| s["in_permission_ui"] == false)
        .count();
    assert_eq!(hidden, 1);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_section_in_a_toggle_is_rejected() {
    let (server, _store) = start_access_server().await;
    let addr = server.addr();

    let role = create_role(addr, "Scout").await;
    let (status, _) = toggle_grant(addr, &role, "payroll", "view", true).await;
    assert_eq!(status, 400);

    server.shutdown().await.unwrap();
}
