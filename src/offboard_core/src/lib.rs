pub mod domain;
pub mod http_abstraction;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    bearer_token::{BearerToken, CredentialError},
    platform_settings::PlatformSettings,
    staff_record::{PrivilegePolicy, StaffRecord},
    table_schema::{RowFilter, TableSchema},
    user::{AuthUser, UserId, UserIdError},
};

pub use ports::{
    credentials::{CredentialSource, SettingsError},
    platform::{CallerScope, PlatformConnector, PlatformError, PrivilegedScope},
};

pub use http_abstraction::{InboundRequest, ResponseBuilder, ResponseHelpers};
