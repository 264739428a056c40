//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use mediavault_api::{AppState, build_router};
use mediavault_core::config::{AppConfig, DefaultFolderLookup};
use mediavault_database::Repositories;
use mediavault_storage::providers::MemoryBlobStorage;

const BOUNDARY: &str = "mediavault-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Repositories behind the router, for direct inspection
    pub repositories: Repositories,
    /// Blob storage behind the router
    pub storage: Arc<MemoryBlobStorage>,
}

impl TestApp {
    /// Create a test application on in-memory backends
    pub fn new() -> Self {
        Self::with_lookup(DefaultFolderLookup::Designated)
    }

    /// Create a test application with the given default folder lookup mode
    pub fn with_lookup(lookup: DefaultFolderLookup) -> Self {
        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.storage.provider = "memory".to_string();
        config.upload.default_folder_lookup = lookup;

        let repositories = Repositories::memory();
        let storage = Arc::new(MemoryBlobStorage::new());
        let state = AppState::new(config, repositories.clone(), storage.clone());

        Self {
            router: build_router(state),
            repositories,
            storage,
        }
    }

    /// Make a JSON request
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// POST a multipart upload to `/upload`
    pub async fn upload(&self, form: Multipart) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(form.finish()))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload one file with no destination
    pub async fn upload_standalone(&self, file_name: &str) -> TestResponse {
        self.upload(Multipart::new().file(file_name, "image/jpeg", b"jpeg-bytes"))
            .await
    }

    /// Upload one file attached to a content entry field
    pub async fn upload_attached(&self, file_name: &str, ref_id: &str) -> TestResponse {
        self.upload(
            Multipart::new()
                .file(file_name, "image/png", b"png-bytes")
                .text("refId", ref_id)
                .text("ref", "api::dog.dog")
                .text("field", "pic"),
        )
        .await
    }

    /// Create a folder through the API and return its JSON
    pub async fn create_folder(&self, name: &str, parent: Option<i64>) -> Value {
        let response = self
            .request(
                "POST",
                "/upload/folders",
                Some(serde_json::json!({ "name": name, "parent": parent })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    /// Bulk delete folders through the API
    pub async fn delete_folders(&self, ids: &[i64]) -> TestResponse {
        self.request(
            "POST",
            "/upload/actions/bulk-delete",
            Some(serde_json::json!({ "folderIds": ids })),
        )
        .await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The first uploaded file of an upload response
    pub fn first_file(&self) -> &Value {
        assert_eq!(self.status, StatusCode::OK, "{}", self.body);
        &self.body[0]
    }
}

/// Builder for a `multipart/form-data` body
#[derive(Debug, Default)]
pub struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `files` part
    pub fn file(mut self, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Add a text part
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}
