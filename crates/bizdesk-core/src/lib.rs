//! Client-side data layer for the bizdesk business dashboard.
//!
//! Sits between `bizdesk-api` and front ends (the CLI):
//!
//! - **[`Dashboard`]**: facade owning the session, API client, slices,
//!   guard, and auth slice.
//!
//! - **[`SessionContext`]**: the one place the bearer token and current
//!   user live, backed by pluggable [`SessionStorage`]. The API client
//!   reads the token through `TokenProvider`.
//!
//! - **[`Slice<R>`]**: per-entity cached page published through
//!   `tokio::sync::watch`. Each list fetch carries a request generation
//!   and stale responses are dropped.
//!
//! - **[`AuthGuard`]**: route-change evaluation (`Render` or `Redirect`),
//!   probing `/auth/me` when a stored token has not been confirmed.
//!
//! - **[`PageContainer<R>`]**: page number, local search, and the
//!   create/edit/delete dialog for one list screen.
//!
//! - **Domain model** ([`model`]): flat records with [`EntityId`]
//!   accepting UUID, numeric, and opaque string keys.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod guard;
pub mod model;
pub mod page;
pub mod requests;
pub mod resource;
pub mod session;
pub mod store;
pub mod stream;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{AuthSlice, AuthState};
pub use config::{ClientConfig, DEFAULT_PAGE_SIZE, TlsVerification};
pub use dashboard::Dashboard;
pub use error::{CoreError, ErrorKind};
pub use filter::{Searchable, filter_items};
pub use guard::{AuthGuard, GuardDecision, GuardState, RouteTable};
pub use page::{Dialog, DialogMode, PageContainer};
pub use requests::*;
pub use resource::Resource;
pub use session::{
    FileSessionStorage, MemorySessionStorage, SessionContext, SessionStorage, StoredSession,
};
pub use store::{DataStore, FetchOutcome, ListState, Slice};
pub use stream::SliceStream;
pub use validate::{FieldError, FieldErrorKind, FieldErrors, Validate};

pub use model::{
    AuthUser, CategoryStatus, Client, ClientIntegration, Employee, EntityId, JobCard, Product,
    ProductCategory, Role, Sale, SaleItem,
};
