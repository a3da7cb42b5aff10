//! Client-side sync configuration.

use serde::{Deserialize, Serialize};

use crate::credential::MissingCredential;

/// Configuration for remote comment and profile requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// What to send when no credential is available.
    pub missing_credential: MissingCredential,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            missing_credential: MissingCredential::SendNull,
        }
    }
}

impl SyncConfig {
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}
