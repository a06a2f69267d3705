// Core HTTP client for the bizdesk REST API.
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection,
// and centralized error normalization. Endpoint groups (collections,
// account) are implemented as inherent methods in sibling modules to
// keep this file focused on transport mechanics.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::TokenProvider;
use crate::error::Error;
use crate::transport::TransportConfig;

const PASSWORD_RESET_CODE: &str = "PASSWORD_RESET_REQUIRED";

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    #[serde(default)]
    message: Option<ErrorMessage>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default, alias = "passwordResetRequired")]
    requires_password_reset: bool,
}

/// Validation pipes on the server report a list of messages.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    fn into_text(self) -> String {
        match self {
            Self::One(s) => s,
            Self::Many(parts) => parts.join("; "),
        }
    }
}

fn fallback_message(status: reqwest::StatusCode) -> String {
    format!("Request failed with status {}", status.as_u16())
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the bizdesk REST API.
///
/// Cheap to share behind an `Arc`. The bearer token is pulled from the
/// [`TokenProvider`] on every request, so login and logout take effect
/// without rebuilding the client.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL string and transport config.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    /// Ensure the base path ends with `/` so relative joins append
    /// instead of replacing the last segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"clients/42"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request plumbing ─────────────────────────────────────────────

    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let Some(token) = self.tokens.bearer_token() else {
            trace!("no bearer token available, sending anonymous request");
            return Ok(builder);
        };
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);
        Ok(builder.header(AUTHORIZATION, value))
    }

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(path)?;
        if query.is_empty() {
            debug!("{method} {url}");
        } else {
            debug!("{method} {url} params={query:?}");
        }

        let mut builder = self.http.request(method, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let builder = self.authorize(builder)?;
        Ok(builder.send().await?)
    }

    /// Send a request and decode the JSON response body.
    pub async fn request<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, Error> {
        let resp = self.send(method, path, query, body).await?;
        handle_response(resp).await
    }

    /// Send a request whose success body is ignored.
    pub async fn request_empty<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), Error> {
        let resp = self.send(method, path, &[], body).await?;
        handle_empty(resp).await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.request::<T, ()>(Method::GET, path, &[], None).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        self.request::<T, ()>(Method::GET, path, params, None).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    pub(crate) async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        self.request_empty(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.request(Method::PATCH, path, &[], Some(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        self.request_empty::<()>(Method::DELETE, path, None).await
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}

async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

/// Normalize a non-2xx response into a typed [`Error`].
async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorResponse>(&raw).ok();

    let (message, code, reset) = match parsed {
        Some(err) => {
            let reset = err.requires_password_reset
                || err.code.as_deref() == Some(PASSWORD_RESET_CODE);
            let message = err
                .message
                .map(ErrorMessage::into_text)
                .or(err.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback_message(status));
            (message, err.code, reset)
        }
        None => (fallback_message(status), None, false),
    };

    debug!(status = status.as_u16(), %message, "request failed");

    if reset {
        Error::PasswordResetRequired { message }
    } else if status == reqwest::StatusCode::UNAUTHORIZED {
        Error::Unauthorized { message }
    } else {
        Error::Api {
            status: status.as_u16(),
            message,
            code,
        }
    }
}
