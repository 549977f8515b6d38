use thiserror::Error;

use crate::domain::platform_settings::PlatformSettings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),
    #[error("Unable to read settings: {0}")]
    Unreadable(String),
}

/// Source of the platform credentials for one invocation.
///
/// Implementations must not cache between calls: each request sees the
/// environment as it is at that moment.
pub trait CredentialSource: Send + Sync {
    fn load(&self) -> Result<PlatformSettings, SettingsError>;
}
