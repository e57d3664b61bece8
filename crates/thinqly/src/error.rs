//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use thinqly_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const OFFLINE: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(thinqly::auth_failed),
        help("Re-run `thinqly auth` and paste the full redirect URL.")
    )]
    AuthFailed { message: String },

    #[error("The saved refresh token was rejected")]
    #[diagnostic(
        code(thinqly::token_rejected),
        help(
            "The account needs a fresh interactive login.\n\
             Run: thinqly auth"
        )
    )]
    TokenRejected,

    #[error("Device '{device_id}' not found")]
    #[diagnostic(
        code(thinqly::device_not_found),
        help("Run `thinqly ls` to see the account's devices.")
    )]
    DeviceNotFound { device_id: String },

    #[error("Device is not connected")]
    #[diagnostic(
        code(thinqly::device_offline),
        help("The appliance is offline; check its network connection.")
    )]
    DeviceOffline,

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(thinqly::api_error))]
    ApiError { code: String, message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(thinqly::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(thinqly::config))]
    Config(#[from] thinqly_config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(thinqly::core))]
    Other(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::TokenRejected => exit_code::AUTH,
            Self::DeviceNotFound { .. } => exit_code::NOT_FOUND,
            Self::DeviceOffline => exit_code::OFFLINE,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(api) => match api {
                thinqly_api::Error::Token => Self::TokenRejected,
                thinqly_api::Error::NotConnected => Self::DeviceOffline,
                thinqly_api::Error::NotLoggedIn => Self::AuthFailed {
                    message: "the access token was rejected".into(),
                },
                thinqly_api::Error::Authentication { message } => Self::AuthFailed { message },
                thinqly_api::Error::Api { code, message } => Self::ApiError { code, message },
                thinqly_api::Error::Monitor { device_id, code } => Self::ApiError {
                    code,
                    message: format!("monitoring {device_id} failed"),
                },
                other => Self::Other(other.to_string()),
            },

            CoreError::DeviceNotFound { device_id } => Self::DeviceNotFound { device_id },

            CoreError::MissingSession => Self::AuthFailed {
                message: "no active session".into(),
            },

            CoreError::StateIo(e) => Self::Io(e),
            CoreError::StateFormat(e) => Self::Other(format!("state file is corrupt: {e}")),
        }
    }
}

impl From<thinqly_api::Error> for CliError {
    fn from(err: thinqly_api::Error) -> Self {
        Self::from(CoreError::Api(err))
    }
}
