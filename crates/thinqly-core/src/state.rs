// Persisted client state
//
// Everything needed to reconstruct a working `Client` without re-running
// the interactive login: the discovered gateway, the token pair, the
// last session id, and the schema cache. Stored as one JSON document.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use thinqly_api::Gateway;

use crate::error::CoreError;

/// The persisted token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub access_token: Option<String>,
    pub refresh_token: String,
}

/// One JSON document capturing a `Client` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientState {
    pub gateway: Gateway,
    pub auth: AuthState,
    /// The last session id. Sessions expire server-side, so restoring
    /// one may still require a refresh-and-relogin on first use.
    #[serde(default)]
    pub session: Option<String>,
    pub country: String,
    pub language: String,
    /// Schema cache, keyed by schema URL. Schemas are immutable
    /// server-side artifacts, safe to persist indefinitely.
    #[serde(default)]
    pub model_info: HashMap<String, Value>,
}

impl ClientState {
    /// Read a state file. A missing file is an `Ok(None)`, not an error.
    pub fn load(path: &Path) -> Result<Option<Self>, CoreError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Write the state file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
