//! Shared fixtures for the black-box router tests.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use mt_api::{configure_routes, AppState};
use mt_store_json::JsonMistakeStore;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A router over a store living in its own temporary directory.
pub struct TestApp {
    pub dir: TempDir,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Same as [`TestApp::new`] with `server.max_body_bytes` set.
    pub fn with_body_limit(limit: usize) -> Self {
        Self::build(Some(limit))
    }

    fn build(max_body_bytes: Option<usize>) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let store = JsonMistakeStore::new(dir.path().join("mistakes.json"));
        let router = configure_routes(
            AppState::new(Arc::new(store)),
            dir.path().join("static"),
            max_body_bytes,
        );
        Self { dir, router }
    }

    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("mistakes.json")
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(method, uri, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json response")
        };
        (status, json)
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, bytes.to_vec())
    }

    /// POSTs a mistake and returns the created record.
    pub async fn add(&self, body: Value) -> Value {
        let (status, json) = self.send(Method::POST, "/api/mistakes", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        json
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
