use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Authorization header is not a bearer credential")]
    NotBearer,
    #[error("Bearer credential is empty")]
    Empty,
}

/// Caller credential taken from the `Authorization` header.
///
/// The token is only ever forwarded to the platform; it is never logged.
#[derive(Debug, Clone)]
pub struct BearerToken(Secret<String>);

impl BearerToken {
    const SCHEME: &'static str = "bearer";

    /// Parse an `Authorization` header value of the form `Bearer <token>`.
    ///
    /// The scheme is matched case-insensitively and surrounding whitespace is
    /// ignored.
    pub fn from_header(value: &str) -> Result<Self, CredentialError> {
        let value = value.trim();
        let (scheme, token) = value
            .split_once(char::is_whitespace)
            .unwrap_or((value, ""));

        if !scheme.eq_ignore_ascii_case(Self::SCHEME) {
            return Err(CredentialError::NotBearer);
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(CredentialError::Empty);
        }

        Ok(Self(Secret::new(token.to_owned())))
    }

    /// Header value to forward to the platform.
    pub fn to_header_value(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }
}

impl AsRef<Secret<String>> for BearerToken {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl From<Secret<String>> for BearerToken {
    fn from(token: Secret<String>) -> Self {
        Self(token)
    }
}
