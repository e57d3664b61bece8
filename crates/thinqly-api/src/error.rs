use thiserror::Error;

/// Top-level error type for the `thinqly-api` crate.
///
/// Covers every failure mode across the protocol surface: envelope return
/// codes, the OAuth refresh exchange, device monitoring, schema
/// interpretation, and transport. `thinqly-core` maps these into its own
/// orchestration errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Envelope return codes ───────────────────────────────────────
    /// The API rejected the access token (`returnCd == "0102"`).
    /// Recoverable: refresh the token and start a new session.
    #[error("Not logged in -- the access token was rejected")]
    NotLoggedIn,

    /// The target appliance is offline (`returnCd == "0106"`).
    /// Not recoverable by retrying; surfaced to the caller.
    #[error("Device is not connected")]
    NotConnected,

    /// Any other non-success return code, with the server's message.
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    // ── Token lifecycle ─────────────────────────────────────────────
    /// The refresh token itself was rejected. Fatal: a new interactive
    /// login is required.
    #[error("The refresh token was rejected -- interactive login required")]
    Token,

    /// Interactive login produced an unusable redirect URL.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Monitoring ──────────────────────────────────────────────────
    /// A monitoring work item died on the server. [`Monitor`] absorbs
    /// this by stopping the dead work item and starting a fresh one.
    ///
    /// [`Monitor`]: crate::monitor::Monitor
    #[error("Monitoring device {device_id} failed (code {code})")]
    Monitor { device_id: String, code: String },

    /// A monitoring session is already active for this device.
    #[error("A monitor is already active for device {device_id}")]
    MonitorActive { device_id: String },

    // ── Schema interpretation ───────────────────────────────────────
    /// The model schema declares a field type the decoder does not
    /// recognize. Fatal: indicates a schema/decoder mismatch.
    #[error("Unsupported value type: {0}")]
    UnsupportedType(String),

    /// The model schema document is malformed (bad monitoring layout,
    /// unusable control template, missing reference table, ...).
    #[error("Malformed model schema: {message}")]
    Schema { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A response body did not parse, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the access token has
    /// expired and a refresh + new session might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::NotLoggedIn)
    }

    /// Returns `true` if this is a transient transport error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Extract the vendor return code, if this error carries one.
    pub fn return_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } | Self::Monitor { code, .. } => Some(code),
            Self::NotLoggedIn => Some("0102"),
            Self::NotConnected => Some("0106"),
            _ => None,
        }
    }
}
