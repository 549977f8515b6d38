use std::sync::{Arc, RwLock};

use ::config::{Config, Environment, Map};
use offboard_core::{CredentialSource, PlatformSettings, SettingsError};
use secrecy::Secret;

use crate::config::env::{
    PLATFORM_ANON_KEY_ENV_VAR, PLATFORM_ENV_PREFIX, PLATFORM_SERVICE_ROLE_KEY_ENV_VAR,
    PLATFORM_URL_ENV_VAR,
};

/// Reads `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `SUPABASE_SERVICE_ROLE_KEY`
/// from the environment on every call.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialSource {
    vars: Option<Arc<RwLock<Map<String, String>>>>,
}

impl EnvCredentialSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `vars` instead of the process environment.
    pub fn with_vars(vars: Map<String, String>) -> Self {
        Self::with_shared_vars(Arc::new(RwLock::new(vars)))
    }

    /// Use a variable map that can still change after the source is built.
    /// Each `load` reads it as it is at that moment.
    pub fn with_shared_vars(vars: Arc<RwLock<Map<String, String>>>) -> Self {
        Self { vars: Some(vars) }
    }

    fn snapshot(&self) -> Result<Option<Map<String, String>>, SettingsError> {
        let Some(vars) = &self.vars else {
            return Ok(None);
        };

        let vars = vars.read().map_err(|e| SettingsError::Unreadable(e.to_string()))?;
        Ok(Some(vars.clone()))
    }
}

impl CredentialSource for EnvCredentialSource {
    fn load(&self) -> Result<PlatformSettings, SettingsError> {
        let values = Config::builder()
            .add_source(
                Environment::with_prefix(PLATFORM_ENV_PREFIX)
                    .prefix_separator("_")
                    .source(self.snapshot()?),
            )
            .build()
            .map_err(|e| SettingsError::Unreadable(e.to_string()))?;

        let url = required(&values, "url", PLATFORM_URL_ENV_VAR)?;
        let anon_key = required(&values, "anon_key", PLATFORM_ANON_KEY_ENV_VAR)?;
        let service_role_key =
            required(&values, "service_role_key", PLATFORM_SERVICE_ROLE_KEY_ENV_VAR)?;

        Ok(PlatformSettings::new(
            url,
            Secret::new(anon_key),
            Secret::new(service_role_key),
        ))
    }
}

fn required(values: &Config, key: &str, var: &'static str) -> Result<String, SettingsError> {
    values
        .get_string(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::Missing(var))
}
