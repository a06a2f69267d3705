use thiserror::Error;

/// Message shown for any failure that never produced an HTTP response.
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";

/// Top-level error type for the `bizdesk-api` crate.
///
/// Every non-2xx response is normalized into one of the HTTP variants
/// below, carrying the server-provided message or a generic fallback.
/// `bizdesk-core` maps these into typed, user-facing error kinds.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// HTTP 401: token missing, expired, or revoked.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The account must set a new password before it can log in.
    #[error("Password reset required: {message}")]
    PasswordResetRequired { message: String },

    /// The stored token cannot be encoded as a header value.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, timeout, or a broken body stream.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Any other non-2xx response.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the session is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if the request never got an HTTP response.
    pub fn is_network(&self) -> bool {
        match self {
            Self::Transport(e) => e.status().is_none(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// HTTP status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The message a user should see for this failure.
    ///
    /// Server-provided messages pass through verbatim; transport failures
    /// collapse into [`CONNECTIVITY_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message }
            | Self::PasswordResetRequired { message }
            | Self::Api { message, .. } => message.clone(),
            Self::Transport(_) => CONNECTIVITY_MESSAGE.to_owned(),
            other => other.to_string(),
        }
    }
}
