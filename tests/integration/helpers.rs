//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use seclink_api::{AppState, admin_router, public_router};
use seclink_core::config::AppConfig;
use seclink_core::traits::clock::ManualClock;
use seclink_service::{LinkService, SecureIdGenerator};
use seclink_storage::FileRoot;
use seclink_store::MemoryLinkStore;

/// Test application context
pub struct TestApp {
    /// Router of the public listener
    pub public: Router,
    /// Router of the admin listener
    pub admin: Router,
    /// Clock shared by the store and the service
    pub clock: Arc<ManualClock>,
    /// The backing store
    pub store: Arc<MemoryLinkStore>,
    /// Root of the shareable files
    pub files_path: PathBuf,
    /// Application config
    pub config: AppConfig,
    _data: tempfile::TempDir,
}

/// A fully buffered response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application with a few files in place
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// Create a new test application from `config`, overriding its data root
    pub async fn with_config(mut config: AppConfig) -> Self {
        let data = tempfile::tempdir().unwrap();
        config.storage.data_root = data.path().to_string_lossy().into_owned();

        let files_path = config.storage.files_path();
        std::fs::create_dir_all(files_path.join("reports")).unwrap();
        std::fs::create_dir_all(config.storage.store_path()).unwrap();
        std::fs::write(files_path.join("hello.txt"), b"hello, world").unwrap();
        std::fs::write(files_path.join("reports/q3.csv"), b"a,b\n1,2\n").unwrap();
        std::fs::write(data.path().join("outside.txt"), b"not for you").unwrap();

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = Arc::new(MemoryLinkStore::new(clock.clone()));
        let files = Arc::new(FileRoot::open(&files_path).await.unwrap());

        let links = Arc::new(LinkService::new(
            store.clone(),
            files.clone(),
            Arc::new(SecureIdGenerator::new(config.links.id_length)),
            clock.clone(),
            config.links.clone(),
        ));

        let state = AppState {
            config: Arc::new(config.clone()),
            links,
            files,
            store: store.clone(),
        };

        Self {
            public: public_router(state.clone()),
            admin: admin_router(state),
            clock,
            store,
            files_path,
            config,
            _data: data,
        }
    }

    /// Send a request to the public router
    pub async fn public_request(&self, method: &str, path: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        send(&self.public, req).await
    }

    /// Send a JSON request to the admin router
    pub async fn admin_request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body = body.map(|b| b.to_string()).unwrap_or_default();
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap();
        send(&self.admin, req).await
    }

    /// Share `path` through the admin API and return the new id
    pub async fn share(&self, path: &str, ttl: &str) -> String {
        let response = self
            .admin_request(
                "POST",
                "/api/v1/links/share",
                Some(serde_json::json!({ "path": path, "ttl": ttl })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "body: {}", response.body);
        response.body["id"].as_str().unwrap().to_string()
    }

    /// Upload `contents` as `filename` in the `field` multipart field
    pub async fn upload(&self, field: &str, filename: &str, contents: &[u8]) -> TestResponse {
        let boundary = "seclink-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/files/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        send(&self.admin, req).await
    }
}

async fn send(router: &Router, req: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(req).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        bytes,
        body,
    }
}
