use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use offboard_adapters::{
    config::AllowedOrigins,
    credentials::StaticCredentialSource,
    handlers::DeletionContext,
    platform::InMemoryPlatform,
};
use offboard_core::{PlatformSettings, PrivilegePolicy, TableSchema};
use offboard_service::OffboardService;
use secrecy::Secret;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ALLOWED_ORIGIN: &str = "https://backoffice.example.com";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const CLERK_TOKEN: &str = "clerk-token";
pub const OUTSIDER_TOKEN: &str = "outsider-token";

pub struct TestApp {
    pub router: Router,
    pub platform: InMemoryPlatform,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_credentials(credentials()).await
    }

    pub async fn with_credentials(credentials: StaticCredentialSource) -> Self {
        let platform = seeded_platform().await;
        let context = DeletionContext::new(
            platform.clone(),
            credentials,
            TableSchema::default(),
            PrivilegePolicy::default(),
        );

        let router = OffboardService::new(context)
            .as_nested_router(Some(AllowedOrigins::new(vec![ALLOWED_ORIGIN.to_string()])));

        Self { router, platform }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, request).await
    }

    pub async fn delete_user(&self, token: Option<&str>, body: &str) -> (StatusCode, Value) {
        self.send(delete_user_request("POST", token, body)).await
    }
}

pub fn credentials() -> StaticCredentialSource {
    StaticCredentialSource::new(PlatformSettings::new(
        "http://platform.test".to_string(),
        Secret::new("anon".to_string()),
        Secret::new("service".to_string()),
    ))
}

pub fn delete_user_request(method: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri("/delete-user")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn seeded_platform() -> InMemoryPlatform {
    let platform = InMemoryPlatform::with_journal();

    platform.add_identity("admin-1", ADMIN_TOKEN).await;
    platform.add_identity("clerk-1", CLERK_TOKEN).await;
    platform.add_identity("outsider-1", OUTSIDER_TOKEN).await;
    platform.add_identity("u123", "target-token").await;

    platform
        .insert_row(
            "staff",
            json!({ "id": "admin-1", "is_admin": false, "role": "Administrador" }),
        )
        .await;
    platform
        .insert_row("staff", json!({ "id": "clerk-1", "is_admin": false, "role": "user" }))
        .await;
    platform
        .insert_row("staff", json!({ "id": "u123", "is_admin": null, "role": "driver" }))
        .await;
    platform
        .insert_row("perfil", json!({ "id": "u123", "user_id": null, "nome": "Ana" }))
        .await;
    platform
        .insert_row("device_authorizations", json!({ "id": 7, "staff_id": "u123" }))
        .await;
    platform
        .insert_row("device_authorizations", json!({ "id": 8, "staff_id": "clerk-1" }))
        .await;

    platform
}
