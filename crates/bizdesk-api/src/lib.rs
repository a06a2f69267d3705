// bizdesk-api: Async Rust client for the bizdesk REST API
//
// Bearer-token auth, centralized error normalization, and the REST
// surface (paginated collections + account endpoints).

pub mod account;
pub mod auth;
pub mod client;
pub mod error;
pub mod resources;
pub mod transport;
pub mod types;

pub use auth::{NoToken, StaticToken, TokenProvider};
pub use client::ApiClient;
pub use error::{CONNECTIVITY_MESSAGE, Error};
pub use transport::{TlsMode, TransportConfig};
pub use types::{LoginResponse, Page, PageMeta};
