// ── Core error types ──
//
// User-facing errors from bizdesk-core. Every operation returns a
// `CoreError`; callers branch on `kind()` rather than inspecting
// message text. The `From<bizdesk_api::Error>` impl translates
// transport-layer errors into these variants.

use bizdesk_api::CONNECTIVITY_MESSAGE;
use thiserror::Error;

use crate::validate::FieldErrors;

/// Broad category of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected locally before any request was sent.
    Validation,
    /// No HTTP response was received.
    Network,
    /// The server answered with a non-2xx status.
    Server,
    /// The session is missing, expired, or must change its password.
    Auth,
    /// Local storage, configuration, or programming errors.
    Local,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ───────────────────────────────────────────────────
    #[error("Validation failed: {errors}")]
    Validation { errors: FieldErrors },

    // ── Connectivity ─────────────────────────────────────────────────
    #[error("{message}")]
    Network { message: String },

    // ── Server responses ─────────────────────────────────────────────
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    PasswordResetRequired { message: String },

    // ── Local ────────────────────────────────────────────────────────
    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    #[error("Session storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Network { .. } => ErrorKind::Network,
            Self::Server { .. } | Self::NotFound { .. } => ErrorKind::Server,
            Self::Unauthorized { .. } | Self::PasswordResetRequired { .. } => ErrorKind::Auth,
            Self::Unsupported { .. }
            | Self::Storage { .. }
            | Self::Config { .. }
            | Self::Internal(_) => ErrorKind::Local,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Field errors, when this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors } => Some(errors),
            _ => None,
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation { errors }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<bizdesk_api::Error> for CoreError {
    fn from(err: bizdesk_api::Error) -> Self {
        match err {
            bizdesk_api::Error::Unauthorized { message } => CoreError::Unauthorized { message },
            bizdesk_api::Error::PasswordResetRequired { message } => {
                CoreError::PasswordResetRequired { message }
            }
            bizdesk_api::Error::InvalidToken(reason) => CoreError::Unauthorized {
                message: format!("Stored session token is unusable: {reason}"),
            },
            bizdesk_api::Error::Transport(ref e) => match e.status() {
                Some(status) => CoreError::Server {
                    status: status.as_u16(),
                    message: format!("Request failed with status {}", status.as_u16()),
                    code: None,
                },
                None => CoreError::Network {
                    message: CONNECTIVITY_MESSAGE.into(),
                },
            },
            bizdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            bizdesk_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            bizdesk_api::Error::Api {
                status,
                message,
                code,
            } => CoreError::Server {
                status,
                message,
                code,
            },
            bizdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_kinds() {
        let err: CoreError = bizdesk_api::Error::Api {
            status: 409,
            message: "Client already exists".into(),
            code: None,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.to_string(), "Client already exists");
        assert_eq!(err.status(), Some(409));

        let err: CoreError = bizdesk_api::Error::Unauthorized {
            message: "Invalid token".into(),
        }
        .into();
        assert!(err.is_unauthorized());
        assert_eq!(err.kind(), ErrorKind::Auth);

        let err: CoreError = bizdesk_api::Error::PasswordResetRequired {
            message: "reset".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Auth);
    }

    #[test]
    fn kind_renders_snake_case() {
        assert_eq!(ErrorKind::Validation.to_string(), "validation");
        assert_eq!(ErrorKind::Network.to_string(), "network");
    }
}
