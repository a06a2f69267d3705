// Wire types shared by every collection endpoint.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// Pagination metadata for the page that was actually returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl PageMeta {
    /// Number of pages needed to show `total` rows, never less than one.
    pub fn page_count(&self) -> u64 {
        if self.limit == 0 {
            return 1;
        }
        self.total.div_ceil(u64::from(self.limit)).max(1)
    }
}

/// One page of a collection.
///
/// Accepts both `{ "data": [...], "meta": {...} }` and a bare JSON array.
/// A bare array carries no pagination, so `meta` is `None`.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: Option<PageMeta>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageWire<T> {
    Envelope {
        #[serde(alias = "items")]
        data: Vec<T>,
        #[serde(default, alias = "pagination")]
        meta: Option<PageMeta>,
    },
    Bare(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match PageWire::deserialize(deserializer)? {
            PageWire::Envelope { data, meta } => Self { data, meta },
            PageWire::Bare(data) => Self { data, meta: None },
        })
    }
}

/// A single record, optionally wrapped as `{ "data": {...} }`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum Single<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Single<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Successful `POST /auth/login` payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse<U> {
    #[serde(alias = "token", alias = "access_token")]
    pub access_token: SecretString,
    pub user: U,
}
