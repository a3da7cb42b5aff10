//! Client configuration.
//!
//! Plain structs with defaults that can also be read from TOML:
//!
//! ```toml
//! base_url = "https://backoffice.example.com"
//! database_path = "pagegate.db"
//!
//! [sync]
//! request_timeout_secs = 10
//! missing_credential = "omit"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pagegate_store::SqliteStore;
use pagegate_sync::{CredentialProvider, HttpRemote, SyncConfig};

use crate::error::{PageGateError, Result};

/// Configuration for a PageGate client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the remote comment and profile API.
    pub base_url: String,
    /// Remote request settings.
    pub sync: SyncConfig,
    /// SQLite file for the principal collection. In-memory when unset.
    pub database_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            sync: SyncConfig::default(),
            database_path: None,
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| PageGateError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| PageGateError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    /// An HTTP remote for `base_url` using `credentials`.
    pub fn http_remote(&self, credentials: impl CredentialProvider + 'static) -> Result<HttpRemote> {
        Ok(HttpRemote::new(&self.base_url, &self.sync, credentials)?)
    }

    /// Open the principal store at `database_path`, or in memory.
    pub fn open_store(&self) -> Result<SqliteStore> {
        let store = match &self.database_path {
            Some(path) => SqliteStore::open(path)?,
            None => SqliteStore::open_memory()?,
        };
        Ok(store)
    }
}
