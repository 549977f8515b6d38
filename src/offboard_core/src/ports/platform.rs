use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    bearer_token::BearerToken, platform_settings::PlatformSettings, table_schema::RowFilter,
    user::{AuthUser, UserId},
};

// Platform port errors
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Invalid platform configuration: {0}")]
    InvalidConfiguration(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Expected at most one row, got {0}")]
    MultipleRows(usize),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Malformed platform response: {0}")]
    MalformedResponse(String),
    #[error("Identifier cannot be addressed: {0:?}")]
    InvalidIdentifier(String),
}

impl PlatformError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl PartialEq for PlatformError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidConfiguration(_), Self::InvalidConfiguration(_)) => true,
            (Self::Api { status: a, .. }, Self::Api { status: b, .. }) => a == b,
            (Self::MultipleRows(a), Self::MultipleRows(b)) => a == b,
            (Self::Transport(_), Self::Transport(_)) => true,
            (Self::MalformedResponse(_), Self::MalformedResponse(_)) => true,
            (Self::InvalidIdentifier(a), Self::InvalidIdentifier(b)) => a == b,
            _ => false,
        }
    }
}

/// Builds the two credential contexts the deletion workflow runs with.
///
/// The caller scope and the privileged scope are always constructed
/// separately and explicitly. Nothing in the workflow can reach the service
/// key except through [`PlatformConnector::privileged_scope`].
pub trait PlatformConnector: Send + Sync {
    type Caller: CallerScope;
    type Privileged: PrivilegedScope;

    /// Scope bound to the low-privilege key plus the caller's own credential.
    fn caller_scope(
        &self,
        settings: &PlatformSettings,
        credential: Option<BearerToken>,
    ) -> Result<Self::Caller, PlatformError>;

    /// Scope bound to the service key. Bypasses row-level authorization.
    fn privileged_scope(&self, settings: &PlatformSettings)
    -> Result<Self::Privileged, PlatformError>;
}

#[async_trait]
pub trait CallerScope: Send + Sync {
    /// Resolve the user the caller credential belongs to.
    ///
    /// `Ok(None)` means the platform does not recognise the credential.
    async fn resolve_user(&self) -> Result<Option<AuthUser>, PlatformError>;
}

#[async_trait]
pub trait PrivilegedScope: Send + Sync {
    /// Fetch at most one row. More than one match is an error.
    async fn select_one(
        &self,
        table: &str,
        columns: &str,
        filter: &RowFilter,
    ) -> Result<Option<serde_json::Value>, PlatformError>;

    /// Delete every matching row and return how many were removed.
    async fn delete_rows(&self, table: &str, filter: &RowFilter) -> Result<u64, PlatformError>;

    /// Delete the authentication identity itself.
    async fn delete_identity(&self, user_id: &UserId) -> Result<(), PlatformError>;
}
