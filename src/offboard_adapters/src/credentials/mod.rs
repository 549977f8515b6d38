pub mod env_credential_source;
pub mod static_credential_source;

pub use env_credential_source::EnvCredentialSource;
pub use static_credential_source::StaticCredentialSource;
