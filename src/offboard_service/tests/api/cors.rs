use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use crate::helpers::{ALLOWED_ORIGIN, TestApp};

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/delete-user")
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization,content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn preflight_from_allowed_origin() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(preflight(ALLOWED_ORIGIN)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ALLOWED_ORIGIN)
    );
    assert!(app.platform.journal().await.is_empty());
}

#[tokio::test]
async fn preflight_from_unknown_origin_gets_no_allow_header() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(preflight("https://evil.example.com"))
        .await
        .unwrap();

    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}
