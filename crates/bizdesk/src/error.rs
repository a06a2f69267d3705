//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use bizdesk_config::ConfigError;
use bizdesk_core::{CoreError, FieldErrors};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const SERVER: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(bizdesk::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Current URL: {url}"
        )
    )]
    ConnectionFailed { url: String, message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(
        code(bizdesk::not_signed_in),
        help("Run: bizdesk login --profile {profile}")
    )]
    NotSignedIn { profile: String },

    #[error("{message}")]
    #[diagnostic(
        code(bizdesk::auth_failed),
        help("Check the email and password for profile '{profile}'.")
    )]
    AuthFailed { profile: String, message: String },

    #[error("{message}")]
    #[diagnostic(
        code(bizdesk::password_reset_required),
        help("Set a new password with: bizdesk change-password")
    )]
    PasswordResetRequired { message: String },

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(bizdesk::no_credentials),
        help(
            "Set it with: bizdesk config set {what} <value>\n\
             Or export BIZDESK_{env}."
        )
    )]
    NoCredentials {
        what: String,
        env: String,
        profile: String,
    },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(bizdesk::not_found),
        help("Run: bizdesk {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(bizdesk::api_error))]
    ApiError { status: Option<u16>, message: String },

    #[error("{operation} is not supported")]
    #[diagnostic(code(bizdesk::unsupported))]
    Unsupported { operation: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bizdesk::validation))]
    Validation { field: String, reason: String },

    #[error("Invalid input: {errors}")]
    #[diagnostic(
        code(bizdesk::invalid_fields),
        help("Fix the listed fields and submit again.")
    )]
    InvalidFields { errors: FieldErrors },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(bizdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: bizdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(bizdesk::no_config),
        help(
            "Create a profile with: bizdesk config init\n\
             Or pass --api-url. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("{message}")]
    #[diagnostic(code(bizdesk::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(bizdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(bizdesk::json), help("Check the JSON payload and try again."))]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    #[diagnostic(code(bizdesk::internal))]
    Internal(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotSignedIn { .. }
            | Self::AuthFailed { .. }
            | Self::PasswordResetRequired { .. }
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. }
            | Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::ApiError { .. } => exit_code::SERVER,
            Self::Validation { .. }
            | Self::InvalidFields { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Json(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile and URL to errors that lack them.
    pub fn in_context(self, profile: &str, url: &str) -> Self {
        match self {
            Self::NotSignedIn { .. } => Self::NotSignedIn {
                profile: profile.into(),
            },
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                profile: profile.into(),
                message,
            },
            Self::ConnectionFailed { message, .. } => Self::ConnectionFailed {
                url: url.into(),
                message,
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { errors } => CliError::InvalidFields { errors },

            CoreError::Network { message } => CliError::ConnectionFailed {
                url: String::new(),
                message,
            },

            CoreError::Server {
                status, message, ..
            } => CliError::ApiError {
                status: Some(status),
                message,
            },

            CoreError::NotFound { entity, identifier } => CliError::NotFound {
                list_command: format!("{} list", list_command_for(&entity)),
                resource_type: entity,
                identifier,
            },

            CoreError::Unauthorized { message } => CliError::AuthFailed {
                profile: String::new(),
                message,
            },

            CoreError::PasswordResetRequired { message } => {
                CliError::PasswordResetRequired { message }
            }

            CoreError::Unsupported { operation } => CliError::Unsupported { operation },

            CoreError::Storage { message } | CoreError::Config { message } => {
                CliError::Config { message }
            }

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

fn list_command_for(entity: &str) -> &'static str {
    match entity {
        "employee" => "employees",
        "product" => "products",
        "product category" => "categories",
        "sale" => "sales",
        "job card" => "job-cards",
        "integration" => "integrations --client <ID>",
        _ => "clients",
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::NoCredentials { what, profile } => CliError::NoCredentials {
                what: what.into(),
                env: what.to_uppercase(),
                profile,
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
