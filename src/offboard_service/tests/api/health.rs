use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn health_returns_ok_without_platform_calls() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
    assert!(app.platform.journal().await.is_empty());
}
