use secrecy::Secret;

/// Connection settings for the data platform, loaded for a single invocation.
///
/// All three values are mandatory; a [`crate::CredentialSource`] only hands
/// out a `PlatformSettings` once it has checked that none of them is empty.
#[derive(Debug, Clone)]
pub struct PlatformSettings {
    pub url: String,
    /// Low-privilege key, combined with the caller's own bearer credential.
    pub anon_key: Secret<String>,
    /// High-privilege key that bypasses row-level authorization.
    pub service_role_key: Secret<String>,
}

impl PlatformSettings {
    pub fn new(url: String, anon_key: Secret<String>, service_role_key: Secret<String>) -> Self {
        Self {
            url,
            anon_key,
            service_role_key,
        }
    }
}
