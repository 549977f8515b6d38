//! Framework-agnostic user deletion handler.

use std::sync::Arc;

use offboard_application::{DeleteUserError, DeleteUserUseCase, DeletionRequest};
use offboard_core::{
    CredentialSource, InboundRequest, PlatformConnector, PrivilegePolicy, ResponseBuilder,
    ResponseHelpers, TableSchema,
};

/// Everything the deletion handler needs besides the request itself.
///
/// Cheap to clone; shared by every invocation.
pub struct DeletionContext<P, C> {
    pub connector: Arc<P>,
    pub credentials: Arc<C>,
    pub schema: Arc<TableSchema>,
    pub policy: Arc<PrivilegePolicy>,
}

impl<P, C> DeletionContext<P, C> {
    pub fn new(connector: P, credentials: C, schema: TableSchema, policy: PrivilegePolicy) -> Self {
        Self {
            connector: Arc::new(connector),
            credentials: Arc::new(credentials),
            schema: Arc::new(schema),
            policy: Arc::new(policy),
        }
    }
}

impl<P, C> Clone for DeletionContext<P, C> {
    fn clone(&self) -> Self {
        Self {
            connector: self.connector.clone(),
            credentials: self.credentials.clone(),
            schema: self.schema.clone(),
            policy: self.policy.clone(),
        }
    }
}

/// Framework-agnostic user deletion handler.
///
/// Runs the deletion use case and renders its outcome. Never fails: every
/// error becomes one of the endpoint's JSON error bodies.
///
/// # Type Parameters
/// * `P` - Platform connector building the caller and privileged scopes
/// * `C` - Source of the platform credentials, read on every call
/// * `R` - Inbound request of the framework being used
/// * `B` - Response builder of the framework being used
pub async fn handle_delete_user<P, C, R, B>(
    context: &DeletionContext<P, C>,
    request: &R,
    body: &[u8],
    builder: B,
) -> B::Response
where
    P: PlatformConnector,
    C: CredentialSource,
    R: InboundRequest,
    B: ResponseBuilder,
{
    let use_case = DeleteUserUseCase::new(
        context.connector.as_ref(),
        context.credentials.as_ref(),
        &context.schema,
        &context.policy,
    );

    let outcome = use_case
        .execute(DeletionRequest {
            method: request.method(),
            authorization: request.header("authorization"),
            body,
        })
        .await;

    match outcome {
        Ok(report) => {
            tracing::info!(
                path = request.path(),
                rows_removed = report.rows_removed(),
                failed_steps = report.failed_steps().count(),
                "User deleted"
            );
            builder.acknowledged()
        }
        Err(e) => error_response(&e, builder),
    }
}

/// Render a deletion error as its status and JSON body.
pub fn error_response<B: ResponseBuilder>(error: &DeleteUserError, builder: B) -> B::Response {
    let status = error.status_code();
    if status >= 500 {
        tracing::error!(code = error.code(), error = %error, "Delete user failed");
    } else {
        tracing::warn!(code = error.code(), "Delete user rejected");
    }

    match error.details() {
        Some(details) => builder.failure_with_details(status, error.code(), &details),
        None => builder.error_code(status, error.code()),
    }
}

/// The catch-all `500` body, for faults raised outside the use case.
pub fn unexpected_response<B: ResponseBuilder>(details: &str, builder: B) -> B::Response {
    error_response(&DeleteUserError::Unexpected(details.to_string()), builder)
}
