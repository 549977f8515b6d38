use offboard_core::{
    AuthUser, BearerToken, CallerScope, CredentialSource, PlatformConnector, PlatformError,
    PrivilegePolicy, PrivilegedScope, SettingsError, StaffRecord, TableSchema, UserId,
};

use super::{
    cascade::{CascadePlan, CascadeReport},
    request_body::target_user_id,
};

/// Error types for the delete user use case.
///
/// Each variant is one response of the deletion endpoint; `code()` is the
/// machine-readable error string and `status_code()` the HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum DeleteUserError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Missing configuration: {0}")]
    MissingEnv(#[from] SettingsError),
    #[error("Caller is not authenticated")]
    Unauthorized,
    #[error("Caller is not in the staff directory")]
    CallerNotFound,
    #[error("Caller is not an admin")]
    Forbidden,
    #[error("Missing user_id")]
    MissingUserId,
    #[error("Failed to delete auth identity: {0}")]
    AuthDeleteFailed(#[source] PlatformError),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl DeleteUserError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "method_not_allowed",
            Self::MissingEnv(_) => "missing_env",
            Self::Unauthorized => "unauthorized",
            Self::CallerNotFound => "caller_not_found",
            Self::Forbidden => "forbidden",
            Self::MissingUserId => "missing_user_id",
            Self::AuthDeleteFailed(_) => "auth_delete_failed",
            Self::Unexpected(_) => "unexpected",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed => 405,
            Self::Unauthorized => 401,
            Self::CallerNotFound | Self::Forbidden => 403,
            Self::MissingUserId => 400,
            Self::MissingEnv(_) | Self::AuthDeleteFailed(_) | Self::Unexpected(_) => 500,
        }
    }

    /// Detail text exposed to the client. Only the dependency failure and the
    /// catch-all carry one.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::AuthDeleteFailed(e) => Some(e.to_string()),
            Self::Unexpected(details) => Some(details.clone()),
            _ => None,
        }
    }
}

/// Everything the use case needs from one inbound HTTP request.
#[derive(Debug, Clone, Copy)]
pub struct DeletionRequest<'a> {
    pub method: &'a str,
    pub authorization: Option<&'a str>,
    pub body: &'a [u8],
}

/// Delete user use case - privileged, cascading account deletion.
pub struct DeleteUserUseCase<'a, P, C>
where
    P: PlatformConnector,
    C: CredentialSource,
{
    connector: &'a P,
    credentials: &'a C,
    schema: &'a TableSchema,
    policy: &'a PrivilegePolicy,
}

impl<'a, P, C> DeleteUserUseCase<'a, P, C>
where
    P: PlatformConnector,
    C: CredentialSource,
{
    pub fn new(
        connector: &'a P,
        credentials: &'a C,
        schema: &'a TableSchema,
        policy: &'a PrivilegePolicy,
    ) -> Self {
        Self {
            connector,
            credentials,
            schema,
            policy,
        }
    }

    /// Execute the delete user use case
    ///
    /// Runs the gate chain in order, stopping at the first failing gate:
    /// method, configuration, caller authentication, directory lookup,
    /// privilege, target id. Then the cascade: best-effort cleanup followed
    /// by the identity deletion, whose failure is returned.
    ///
    /// # Returns
    /// The cleanup report on success, or the `DeleteUserError` of the gate
    /// that stopped the request
    #[tracing::instrument(name = "DeleteUserUseCase::execute", skip_all, fields(method = request.method))]
    pub async fn execute(
        &self,
        request: DeletionRequest<'_>,
    ) -> Result<CascadeReport, DeleteUserError> {
        if request.method != "POST" {
            return Err(DeleteUserError::MethodNotAllowed);
        }

        let settings = self.credentials.load()?;

        let credential = request
            .authorization
            .and_then(|header| BearerToken::from_header(header).ok());

        let caller_scope = self
            .connector
            .caller_scope(&settings, credential)
            .map_err(|e| DeleteUserError::Unexpected(e.to_string()))?;
        let privileged_scope = self
            .connector
            .privileged_scope(&settings)
            .map_err(|e| DeleteUserError::Unexpected(e.to_string()))?;

        let caller = self.authenticate(&caller_scope).await?;
        let record = self.lookup_staff(&privileged_scope, &caller).await?;

        if !self.policy.is_privileged(&record) {
            tracing::warn!(caller = %caller, "Caller is not an admin");
            return Err(DeleteUserError::Forbidden);
        }

        let target = UserId::try_from(target_user_id(request.body))
            .map_err(|_| DeleteUserError::MissingUserId)?;

        tracing::info!(caller = %caller, target = %target, "Deleting user");

        let plan = CascadePlan::new(self.schema, target);
        let report = plan.run_cleanup(&privileged_scope).await;

        plan.revoke(&privileged_scope).await.map_err(|e| {
            tracing::error!(target = %plan.target(), error = %e, "Identity deletion failed");
            DeleteUserError::AuthDeleteFailed(e)
        })?;

        Ok(report)
    }

    async fn authenticate(&self, scope: &P::Caller) -> Result<UserId, DeleteUserError> {
        let user: Option<AuthUser> = scope.resolve_user().await.map_err(|e| {
            tracing::warn!(error = %e, "Caller resolution failed");
            DeleteUserError::Unauthorized
        })?;

        user.and_then(|user| user.user_id().ok())
            .ok_or(DeleteUserError::Unauthorized)
    }

    /// Lookup errors and missing records are reported the same way.
    async fn lookup_staff(
        &self,
        scope: &P::Privileged,
        caller: &UserId,
    ) -> Result<StaffRecord, DeleteUserError> {
        let row = scope
            .select_one(
                &self.schema.staff_table,
                &self.schema.staff_select,
                &self.schema.staff_filter(caller),
            )
            .await
            .map_err(|e| {
                tracing::warn!(caller = %caller, error = %e, "Staff lookup failed");
                DeleteUserError::CallerNotFound
            })?
            .ok_or(DeleteUserError::CallerNotFound)?;

        serde_json::from_value(row).map_err(|e| {
            tracing::warn!(caller = %caller, error = %e, "Staff record is malformed");
            DeleteUserError::CallerNotFound
        })
    }
}
