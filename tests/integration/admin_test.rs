//! Integration tests for the admin API.

mod helpers;

use axum::http::StatusCode;
use chrono::TimeDelta;
use serde_json::json;

use seclink_core::config::AppConfig;
use seclink_core::traits::store::ExpiringKeyValueStore;

#[tokio::test]
async fn test_share_returns_id_and_expiry() {
    let app = helpers::TestApp::new().await;

    let response = app
        .admin_request(
            "POST",
            "/api/v1/links/share",
            Some(json!({ "path": "hello.txt", "ttl": "30m" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["id"].as_str().unwrap();
    assert_eq!(id.len(), 64);
    assert!(response.body.get("url").is_none());
    assert!(response.body["expires_at"].is_string());
}

#[tokio::test]
async fn test_share_builds_url_from_external_url() {
    let mut config = AppConfig::default();
    config.links.external_url = Some("https://files.example.org/".to_string());
    let app = helpers::TestApp::with_config(config).await;

    let response = app
        .admin_request(
            "POST",
            "/api/v1/links/share",
            Some(json!({ "path": "hello.txt" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["id"].as_str().unwrap();
    assert_eq!(
        response.body["url"],
        format!("https://files.example.org/links/{id}")
    );
}

#[tokio::test]
async fn test_share_without_ttl_uses_default() {
    let app = helpers::TestApp::new().await;
    app.admin_request(
        "POST",
        "/api/v1/links/share",
        Some(json!({ "path": "hello.txt" })),
    )
    .await;

    let response = app.admin_request("GET", "/api/v1/links", None).await;
    assert_eq!(response.body[0]["remaining_ttl_seconds"], 24 * 3600);
}

#[tokio::test]
async fn test_share_error_statuses() {
    let app = helpers::TestApp::new().await;

    let cases = [
        (json!({ "path": "../outside.txt", "ttl": "1h" }), StatusCode::FORBIDDEN),
        (json!({ "path": "/etc/passwd", "ttl": "1h" }), StatusCode::FORBIDDEN),
        (json!({ "path": "missing.txt", "ttl": "1h" }), StatusCode::NOT_FOUND),
        (json!({ "path": "reports", "ttl": "1h" }), StatusCode::NOT_FOUND),
        (json!({ "path": "hello.txt", "ttl": "soon" }), StatusCode::BAD_REQUEST),
        (json!({ "path": "hello.txt", "ttl": "-5m" }), StatusCode::BAD_REQUEST),
        (json!({ "path": "", "ttl": "1h" }), StatusCode::BAD_REQUEST),
    ];

    for (body, expected) in cases {
        let response = app
            .admin_request("POST", "/api/v1/links/share", Some(body.clone()))
            .await;
        assert_eq!(response.status, expected, "request {body}");
        assert!(response.body["error"].is_string(), "request {body}");
    }

    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_list_links_shows_remaining_time_and_drops_expired() {
    let app = helpers::TestApp::new().await;
    app.share("hello.txt", "10m").await;
    app.share("reports/q3.csv", "2h").await;

    app.clock.advance(TimeDelta::minutes(4));
    let response = app.admin_request("GET", "/api/v1/links", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let links = response.body.as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["path"], "hello.txt");
    assert_eq!(links[0]["remaining_ttl"], "6m0s");

    app.clock.advance(TimeDelta::minutes(6));
    let response = app.admin_request("GET", "/api/v1/links", None).await;
    let links = response.body.as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["path"], "reports/q3.csv");
}

#[tokio::test]
async fn test_list_files() {
    let app = helpers::TestApp::new().await;

    let response = app.admin_request("GET", "/api/v1/files", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["default_ttl"], "24h");
    let paths: Vec<_> = response.body["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(paths, vec!["hello.txt", "reports/q3.csv"]);
}

#[tokio::test]
async fn test_upload_then_share() {
    let app = helpers::TestApp::new().await;

    let response = app.upload("binaryFile", "notes.md", b"# notes\n").await;
    assert_eq!(response.status, StatusCode::CREATED, "body: {}", response.body);
    assert_eq!(response.body["filename"], "notes.md");
    assert_eq!(response.body["size_bytes"], 8);

    let id = app.share("notes.md", "1h").await;
    let response = app.public_request("GET", &format!("/links/{id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, b"# notes\n");
}

#[tokio::test]
async fn test_upload_rejects_bad_names_and_missing_field() {
    let app = helpers::TestApp::new().await;

    let response = app.upload("binaryFile", "..", b"x").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.upload("somethingElse", "ok.txt", b"x").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!app.files_path.join("ok.txt").exists());
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new().await;

    let response = app.admin_request("GET", "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["store"], "memory");

    app.store.close().await.unwrap();
    let response = app.admin_request("GET", "/health", None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}
