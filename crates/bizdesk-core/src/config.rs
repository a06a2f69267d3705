// ── Runtime connection configuration ──
//
// Describes *how* to reach the API and which routes are public. The CLI
// builds a `ClientConfig` from its profile; core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use bizdesk_api::{TlsMode, TransportConfig};
use url::Url;

/// Rows per page requested by every page container.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Development servers only.
    DangerAcceptInvalid,
}

/// Configuration for one dashboard backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, including any path prefix (e.g. `https://erp.local/api`).
    pub api_url: Url,
    pub tls: TlsVerification,
    /// Request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
    pub page_size: u32,
    /// Routes reachable without a session.
    pub public_routes: Vec<String>,
    pub login_route: String,
    pub home_route: String,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: None,
            page_size: DEFAULT_PAGE_SIZE,
            public_routes: vec!["/login".into(), "/forgot-password".into()],
            login_route: "/login".into(),
            home_route: "/".into(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
