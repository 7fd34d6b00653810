//! Integration tests for link redemption on the public router.

mod helpers;

use axum::http::{StatusCode, header};
use chrono::TimeDelta;

#[tokio::test]
async fn test_redeem_streams_file_as_attachment() {
    let app = helpers::TestApp::new().await;
    let id = app.share("reports/q3.csv", "10m").await;

    let response = app.public_request("GET", &format!("/links/{id}")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, b"a,b\n1,2\n");
    assert_eq!(
        response.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"q3.csv\""
    );
    assert_eq!(response.headers[header::CONTENT_TYPE], "text/csv");
    assert_eq!(response.headers[header::CONTENT_LENGTH], "8");
}

#[tokio::test]
async fn test_redeem_can_repeat_until_expiry() {
    let app = helpers::TestApp::new().await;
    let id = app.share("hello.txt", "1m").await;
    let path = format!("/links/{id}");

    for _ in 0..3 {
        let response = app.public_request("GET", &path).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.bytes, b"hello, world");
    }

    app.clock.advance(TimeDelta::seconds(61));
    let response = app.public_request("GET", &path).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_expired_and_deleted_look_identical() {
    let app = helpers::TestApp::new().await;
    let expired = app.share("hello.txt", "5s").await;
    let deleted = app.share("reports/q3.csv", "1h").await;
    app.clock.advance(TimeDelta::seconds(10));
    std::fs::remove_file(app.files_path.join("reports/q3.csv")).unwrap();

    let responses = [
        app.public_request("GET", "/links/not-a-real-id").await,
        app.public_request("GET", &format!("/links/{expired}")).await,
        app.public_request("GET", &format!("/links/{deleted}")).await,
    ];

    for response in &responses {
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.bytes, responses[0].bytes);
    }
}

#[tokio::test]
async fn test_public_router_exposes_no_admin_routes() {
    let app = helpers::TestApp::new().await;

    let response = app.public_request("GET", "/api/v1/links").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.public_request("POST", "/api/v1/links/share").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[cfg(unix)]
#[tokio::test]
async fn test_file_swapped_for_escaping_symlink_is_not_served() {
    let app = helpers::TestApp::new().await;
    let id = app.share("hello.txt", "1h").await;

    let target = app.files_path.join("hello.txt");
    std::fs::remove_file(&target).unwrap();
    std::os::unix::fs::symlink(app.files_path.join("../outside.txt"), &target).unwrap();

    let response = app.public_request("GET", &format!("/links/{id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
