use axum::http::StatusCode;
use offboard_adapters::{
    credentials::StaticCredentialSource,
    handlers::DeletionContext,
    platform::{InMemoryPlatform, PlatformCall},
};
use offboard_core::{
    CredentialSource, PlatformSettings, PrivilegePolicy, RowFilter, SettingsError, TableSchema,
    UserId,
};
use offboard_service::OffboardService;
use serde_json::json;

use crate::helpers::{
    ADMIN_TOKEN, CLERK_TOKEN, OUTSIDER_TOKEN, TestApp, delete_user_request, send,
};

const TARGET_BODY: &str = r#"{"user_id":"u123"}"#;

#[tokio::test]
async fn non_post_methods_are_rejected_without_side_effects() {
    let app = TestApp::new().await;

    for method in ["GET", "PUT", "DELETE", "PATCH", "post"] {
        let (status, body) = app
            .send(delete_user_request(method, Some(ADMIN_TOKEN), TARGET_BODY))
            .await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(body, json!({ "error": "method_not_allowed" }));
    }

    assert!(app.platform.journal().await.is_empty());
    assert!(app.platform.has_identity("u123").await);
}

#[tokio::test]
async fn missing_configuration_is_reported_before_any_platform_call() {
    let app = TestApp::with_credentials(StaticCredentialSource::missing()).await;

    let (status, body) = app.delete_user(Some(ADMIN_TOKEN), TARGET_BODY).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "missing_env" }));
    assert!(app.platform.journal().await.is_empty());
}

#[tokio::test]
async fn unknown_or_missing_credential_is_unauthorized() {
    let app = TestApp::new().await;

    for token in [Some("not-a-real-token"), None] {
        let (status, body) = app.delete_user(token, TARGET_BODY).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "unauthorized" }));
    }

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/delete-user")
        .header("authorization", "Basic YWRtaW46YWRtaW4=")
        .body(axum::body::Body::from(TARGET_BODY))
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn caller_outside_the_directory_is_caller_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.delete_user(Some(OUTSIDER_TOKEN), TARGET_BODY).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "caller_not_found" }));
}

#[tokio::test]
async fn loosely_typed_directory_rows_are_still_checked() {
    let app = TestApp::new().await;
    app.platform
        .insert_row(
            "staff",
            json!({ "id": "outsider-1", "is_admin": "true", "role": "Admin" }),
        )
        .await;

    let (status, body) = app.delete_user(Some(OUTSIDER_TOKEN), TARGET_BODY).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
    assert!(!app.platform.has_identity("u123").await);
}

#[tokio::test]
async fn numeric_role_is_forbidden_not_caller_not_found() {
    let app = TestApp::new().await;
    app.platform
        .insert_row("staff", json!({ "id": "outsider-1", "is_admin": 1, "role": 7 }))
        .await;

    let (status, body) = app.delete_user(Some(OUTSIDER_TOKEN), TARGET_BODY).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "forbidden" }));
    assert!(app.platform.has_identity("u123").await);
}

#[tokio::test]
async fn unprivileged_caller_is_forbidden_even_with_malformed_body() {
    let app = TestApp::new().await;

    let (status, body) = app.delete_user(Some(CLERK_TOKEN), TARGET_BODY).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "forbidden" }));

    let (status, body) = app.delete_user(Some(CLERK_TOKEN), "{{{").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "forbidden" }));

    assert!(app.platform.has_identity("u123").await);
}

#[tokio::test]
async fn admin_without_target_gets_missing_user_id() {
    let app = TestApp::new().await;

    for body in [r#"{"user_id":""}"#, "{}", "not json", "", r#"{"user_id":null}"#] {
        let (status, response) = app.delete_user(Some(ADMIN_TOKEN), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response, json!({ "error": "missing_user_id" }));
    }
}

#[tokio::test]
async fn admin_deletes_user_and_dependent_rows() {
    let app = TestApp::new().await;

    let (status, body) = app.delete_user(Some(ADMIN_TOKEN), TARGET_BODY).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    assert!(!app.platform.has_identity("u123").await);
    assert!(app.platform.rows("perfil").await.is_empty());
    assert_eq!(
        app.platform.rows("device_authorizations").await,
        vec![json!({ "id": 8, "staff_id": "clerk-1" })]
    );
    assert_eq!(app.platform.rows("staff").await.len(), 2);

    let schema = TableSchema::default();
    let target = UserId::try_from("u123").unwrap();
    assert_eq!(
        app.platform.journal().await,
        vec![
            PlatformCall::ResolveUser,
            PlatformCall::SelectOne {
                table: "staff".to_string()
            },
            PlatformCall::DeleteRows {
                table: "perfil".to_string(),
                filter: schema.profile_filter(&target),
            },
            PlatformCall::DeleteRows {
                table: "device_authorizations".to_string(),
                filter: RowFilter::eq("staff_id", "u123"),
            },
            PlatformCall::DeleteRows {
                table: "staff".to_string(),
                filter: RowFilter::eq("id", "u123"),
            },
            PlatformCall::DeleteIdentity("u123".to_string()),
        ]
    );
}

#[tokio::test]
async fn functions_path_is_an_alias() {
    let app = TestApp::new().await;

    let mut request = delete_user_request("POST", Some(ADMIN_TOKEN), TARGET_BODY);
    *request.uri_mut() = "/functions/v1/delete_user".parse().unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn second_deletion_surfaces_auth_delete_failed() {
    let app = TestApp::new().await;

    let (status, _) = app.delete_user(Some(ADMIN_TOKEN), TARGET_BODY).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.delete_user(Some(ADMIN_TOKEN), TARGET_BODY).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "ok": false, "error": "auth_delete_failed", "details": "User not found" })
    );
}

#[tokio::test]
async fn cleanup_failures_do_not_block_identity_deletion() {
    let app = TestApp::new().await;
    app.platform.fail_table("device_authorizations").await;

    let (status, body) = app.delete_user(Some(ADMIN_TOKEN), TARGET_BODY).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
    assert!(!app.platform.has_identity("u123").await);
    assert_eq!(app.platform.rows("device_authorizations").await.len(), 2);
}

#[tokio::test]
async fn identity_deletion_failure_is_reported_with_details() {
    let app = TestApp::new().await;
    app.platform
        .fail_identity_deletion(500, "Database error deleting user")
        .await;

    let (status, body) = app.delete_user(Some(ADMIN_TOKEN), TARGET_BODY).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "ok": false,
            "error": "auth_delete_failed",
            "details": "Database error deleting user"
        })
    );
    assert!(app.platform.rows("perfil").await.is_empty());
}

struct ExplodingCredentials;

impl CredentialSource for ExplodingCredentials {
    fn load(&self) -> Result<PlatformSettings, SettingsError> {
        panic!("credential store exploded")
    }
}

#[tokio::test]
async fn panics_become_unexpected() {
    let context = DeletionContext::new(
        InMemoryPlatform::new(),
        ExplodingCredentials,
        TableSchema::default(),
        PrivilegePolicy::default(),
    );
    let router = OffboardService::new(context).as_nested_router(None);

    let (status, body) = send(
        &router,
        delete_user_request("POST", Some(ADMIN_TOKEN), TARGET_BODY),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "ok": false, "error": "unexpected", "details": "credential store exploded" })
    );

    let (status, _) = send(&router, delete_user_request("GET", None, "")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
