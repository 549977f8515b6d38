use offboard_core::{CredentialSource, PlatformSettings, SettingsError};

/// Fixed credentials, for tests and embedding. `None` behaves like an
/// environment with no platform variables at all.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialSource(Option<PlatformSettings>);

impl StaticCredentialSource {
    pub fn new(settings: PlatformSettings) -> Self {
        Self(Some(settings))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredentialSource {
    fn load(&self) -> Result<PlatformSettings, SettingsError> {
        self.0.clone().ok_or(SettingsError::Missing(
            crate::config::env::PLATFORM_URL_ENV_VAR,
        ))
    }
}
