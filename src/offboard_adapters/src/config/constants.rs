pub mod env {
    /// Prefix shared by the three per-invocation platform variables.
    pub const PLATFORM_ENV_PREFIX: &str = "SUPABASE";
    pub const PLATFORM_URL_ENV_VAR: &str = "SUPABASE_URL";
    pub const PLATFORM_ANON_KEY_ENV_VAR: &str = "SUPABASE_ANON_KEY";
    pub const PLATFORM_SERVICE_ROLE_KEY_ENV_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

    /// Prefix of the startup settings, e.g. `OFFBOARD_BIND_ADDRESS`.
    pub const SETTINGS_ENV_PREFIX: &str = "OFFBOARD";
}

pub const SETTINGS_FILE: &str = "config/offboard";

pub mod routes {
    pub const DELETE_USER: &str = "/delete-user";
    /// Path of the hosted function this service replaces.
    pub const DELETE_USER_FUNCTION: &str = "/functions/v1/delete_user";
    pub const HEALTH: &str = "/health";
}

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
}
