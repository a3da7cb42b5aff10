//! Bearer credentials for remote requests.
//!
//! Credentials are injected through [`CredentialProvider`] rather than read
//! from ambient storage, so each client decides where its token comes from.

use serde::{Deserialize, Serialize};

/// Source of the bearer token attached to remote requests.
pub trait CredentialProvider: Send + Sync {
    /// The current token, if any.
    fn token(&self) -> Option<String>;
}

/// A fixed token.
#[derive(Debug, Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialProvider for StaticCredential {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// No token at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredential;

impl CredentialProvider for NoCredential {
    fn token(&self) -> Option<String> {
        None
    }
}

/// What to send when the provider has no token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCredential {
    /// Send `Authorization: Bearer null`, which existing servers expect.
    #[default]
    SendNull,
    /// Leave the `Authorization` header off.
    Omit,
}

/// The `Authorization` header value for a request, or `None` to omit it.
pub fn authorization_value(
    credentials: &dyn CredentialProvider,
    missing: MissingCredential,
) -> Option<String> {
    match (credentials.token(), missing) {
        (Some(token), _) => Some(format!("Bearer {}", token)),
        (None, MissingCredential::SendNull) => Some("Bearer null".to_string()),
        (None, MissingCredential::Omit) => None,
    }
}
