use std::path::PathBuf;

use ::config::{Config, ConfigError, Environment, File, Map};
use offboard_core::{PrivilegePolicy, TableSchema};
use serde::Deserialize;

use super::constants::{SETTINGS_FILE, env::SETTINGS_ENV_PREFIX, prod};

/// Which platform implementation the service talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Supabase,
    /// In-process fake, for local runs without a platform.
    Memory,
}

/// Startup settings of the service.
///
/// Loaded once at startup. The platform credentials are not part
/// of this struct: they are read on every request by
/// [`crate::credentials::EnvCredentialSource`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub bind_address: String,
    pub allowed_origins: Option<Vec<String>>,
    pub platform_timeout_ms: Option<u64>,
    pub admin_roles: Vec<String>,
    pub schema: TableSchema,
    pub backend: Backend,
    pub memory_seed: Option<PathBuf>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            bind_address: prod::APP_ADDRESS.to_string(),
            allowed_origins: None,
            platform_timeout_ms: None,
            admin_roles: PrivilegePolicy::DEFAULT_ADMIN_ROLES
                .iter()
                .map(|role| role.to_string())
                .collect(),
            schema: TableSchema::default(),
            backend: Backend::default(),
            memory_seed: None,
        }
    }
}

impl ServiceSettings {
    /// Load from `config/offboard.*` (optional) and `OFFBOARD_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Same as [`ServiceSettings::load`], with the environment replaced by
    /// `vars` when given.
    pub fn load_from(vars: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(SETTINGS_FILE).required(false))
            .add_source(
                Environment::with_prefix(SETTINGS_ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins")
                    .with_list_parse_key("admin_roles")
                    .source(vars),
            )
            .build()?
            .try_deserialize()
    }

    pub fn privilege_policy(&self) -> PrivilegePolicy {
        PrivilegePolicy::new(&self.admin_roles)
    }

    pub fn allowed_origins(&self) -> Option<AllowedOrigins> {
        self.allowed_origins.clone().map(AllowedOrigins::new)
    }

    pub fn platform_timeout(&self) -> Option<std::time::Duration> {
        self.platform_timeout_ms
            .map(std::time::Duration::from_millis)
    }
}

/// Origins allowed to call the service from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new(origins: Vec<String>) -> Self {
        Self(
            origins
                .into_iter()
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }
}
