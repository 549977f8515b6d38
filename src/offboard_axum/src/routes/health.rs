use axum::response::Response;
use offboard_core::ResponseBuilder;

use crate::adapters::response_builder;

/// Liveness check. Never touches the platform.
pub async fn health() -> Response {
    response_builder()
        .status(200)
        .json_body(serde_json::json!({ "status": "ok" }))
        .build()
}
