use thiserror::Error;

/// Orchestration-level errors for `thinqly-core`.
///
/// Protocol failures pass through as [`Api`](CoreError::Api); the other
/// variants are conditions only the orchestration layer can detect.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A protocol-level failure from the api crate.
    #[error(transparent)]
    Api(#[from] thinqly_api::Error),

    /// No device with this id in the account's device list.
    #[error("Device not found: {device_id}")]
    DeviceNotFound { device_id: String },

    /// An operation needed a live session but the client has none yet.
    #[error("No active session -- authenticate first")]
    MissingSession,

    /// Persisted state could not be read or written.
    #[error("State file error: {0}")]
    StateIo(#[from] std::io::Error),

    /// Persisted state did not parse.
    #[error("State file is not valid JSON: {0}")]
    StateFormat(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns `true` when the underlying failure is a rejected access
    /// token (the refresh-and-retry-once trigger).
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_auth_expired())
    }
}
