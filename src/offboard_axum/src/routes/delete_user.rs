//! Axum-specific user deletion route.

use axum::{
    body::to_bytes,
    extract::{Request, State},
    response::Response,
};
use offboard_adapters::handlers::{self, DeletionContext};
use offboard_core::{CredentialSource, PlatformConnector};

use crate::adapters::{AxumRequest, response_builder};

/// Largest request body read. Anything bigger is treated as an empty body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Axum user deletion route.
///
/// Mounted for every method: the handler itself answers non-POST requests
/// with the JSON 405 body.
#[tracing::instrument(name = "Delete User", skip_all)]
pub async fn delete_user<P, C>(
    State(context): State<DeletionContext<P, C>>,
    request: Request,
) -> Response
where
    P: PlatformConnector + 'static,
    C: CredentialSource + 'static,
{
    let (parts, body) = request.into_parts();

    let body = to_bytes(body, MAX_BODY_BYTES).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to read request body");
        Default::default()
    });

    handlers::handle_delete_user(&context, &AxumRequest(parts), &body, response_builder()).await
}
