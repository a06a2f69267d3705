// ── Per-entity state slice ──
//
// Holds the cached page for one entity and the operations that change it.
// Every list fetch takes a new request generation; a response is applied
// only if no newer fetch was issued in the meantime, so a slow reply for
// an earlier page or scope can never overwrite a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bizdesk_api::{ApiClient, Page};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::state::ListState;
use crate::error::CoreError;
use crate::model::EntityId;
use crate::resource::Resource;
use crate::stream::SliceStream;
use crate::validate::Validate;

/// What happened to a list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the slice contents.
    Applied,
    /// A newer fetch was issued first; the response was dropped.
    Superseded,
    /// Scoped collection with no scope selected; nothing was requested.
    Skipped,
}

pub struct Slice<R: Resource> {
    api: Arc<ApiClient>,
    state: watch::Sender<Arc<ListState<R>>>,
    generation: AtomicU64,
    /// Bumped whenever the scope changes or the slice is reset.
    scope_epoch: AtomicU64,
}

impl<R: Resource> Slice<R> {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(Arc::new(ListState::default()));
        Self {
            api,
            state,
            generation: AtomicU64::new(0),
            scope_epoch: AtomicU64::new(0),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current state (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<ListState<R>> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> SliceStream<R> {
        SliceStream::new(self.state.subscribe())
    }

    // ── List fetches ─────────────────────────────────────────────────

    /// Load one page into `items`/`pagination`.
    ///
    /// On failure the previous `items` stay in place and `error` is set.
    pub async fn fetch_list(&self, page: u32, limit: u32) -> Result<FetchOutcome, CoreError> {
        let generation = self.begin(|_| {});
        self.run_fetch(generation, page, limit).await
    }

    /// Switch a scoped collection to a new parent and load it.
    ///
    /// The old rows are cleared before the request goes out.
    pub async fn select_scope(
        &self,
        scope: EntityId,
        limit: u32,
    ) -> Result<FetchOutcome, CoreError> {
        if R::SCOPE_PARAM.is_none() {
            return Err(CoreError::Unsupported {
                operation: format!("scoping {} lists", R::LABEL),
            });
        }
        debug!(entity = R::LABEL, %scope, "selecting scope");
        self.scope_epoch.fetch_add(1, Ordering::SeqCst);
        let generation = self.begin(|s| {
            s.scope = Some(scope);
            s.items.clear();
            s.pagination = None;
            s.selected = None;
        });
        self.run_fetch(generation, 1, limit).await
    }

    /// Bump the generation and mark the slice loading.
    fn begin(&self, prepare: impl FnOnce(&mut ListState<R>)) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|arc| {
            let s = Arc::make_mut(arc);
            s.is_loading = true;
            s.error = None;
            prepare(s);
        });
        generation
    }

    /// Apply `update` only if `generation` is still the latest.
    fn commit(&self, generation: u64, update: impl FnOnce(&mut ListState<R>)) -> bool {
        self.state.send_if_modified(|arc| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            update(Arc::make_mut(arc));
            true
        })
    }

    async fn run_fetch(
        &self,
        generation: u64,
        page: u32,
        limit: u32,
    ) -> Result<FetchOutcome, CoreError> {
        let result = match R::SCOPE_PARAM {
            Some(param) => {
                let Some(scope) = self.snapshot().scope.clone() else {
                    self.commit(generation, |s| {
                        s.is_loading = false;
                        s.items.clear();
                        s.pagination = None;
                    });
                    return Ok(FetchOutcome::Skipped);
                };
                self.api
                    .list_where::<R>(R::COLLECTION, &[(param, scope.to_string())])
                    .await
            }
            None => self.api.list::<R>(R::COLLECTION, page, limit).await,
        };

        match result {
            Ok(Page { data, meta }) => {
                let count = data.len();
                if self.commit(generation, |s| {
                    s.items = data;
                    s.pagination = meta;
                    s.is_loading = false;
                }) {
                    debug!(entity = R::LABEL, page, count, "list applied");
                    Ok(FetchOutcome::Applied)
                } else {
                    debug!(entity = R::LABEL, page, generation, "dropping stale list response");
                    Ok(FetchOutcome::Superseded)
                }
            }
            Err(e) => {
                let err = CoreError::from(e);
                let applied = self.commit(generation, |s| {
                    s.is_loading = false;
                    // 401s belong to the guard, not the list screen.
                    if !err.is_unauthorized() {
                        s.error = Some(err.to_string());
                    }
                });
                if applied {
                    warn!(entity = R::LABEL, page, error = %err, "list fetch failed");
                    Err(err)
                } else {
                    debug!(entity = R::LABEL, generation, "dropping stale list failure");
                    Ok(FetchOutcome::Superseded)
                }
            }
        }
    }

    // ── Single record ────────────────────────────────────────────────

    /// Load one record into `selected`.
    ///
    /// Failures go back to the caller and never into `error`. The record
    /// is dropped if the scope changed while the request was in flight.
    pub async fn fetch_one(&self, id: &EntityId) -> Result<R, CoreError> {
        let epoch = self.scope_epoch.load(Ordering::SeqCst);
        let id_str = id.to_string();
        let record = self
            .api
            .get_record::<R>(R::COLLECTION, &id_str)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    CoreError::NotFound {
                        entity: R::LABEL.into(),
                        identifier: id_str.clone(),
                    }
                } else {
                    CoreError::from(e)
                }
            })?;

        let selected = record.clone();
        let applied = self.state.send_if_modified(|arc| {
            if self.scope_epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            Arc::make_mut(arc).selected = Some(selected);
            true
        });
        if !applied {
            debug!(entity = R::LABEL, %id, "dropping lookup from a previous scope");
        }
        Ok(record)
    }

    // ── Mutations ────────────────────────────────────────────────────
    //
    // Mutations leave the cached page alone; the caller refetches. Their
    // failures go back to the caller and never into `error`.

    pub async fn create(&self, data: &R::Create) -> Result<R, CoreError> {
        data.validate()?;
        let record = self.api.create_record(R::COLLECTION, data).await?;
        debug!(entity = R::LABEL, "created");
        Ok(record)
    }

    pub async fn update(&self, id: &EntityId, data: &R::Update) -> Result<R, CoreError> {
        data.validate()?;
        let record = self
            .api
            .update_record(R::COLLECTION, &id.to_string(), data)
            .await?;
        debug!(entity = R::LABEL, %id, "updated");
        Ok(record)
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        self.api
            .delete_record(R::COLLECTION, &id.to_string())
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    CoreError::NotFound {
                        entity: R::LABEL.into(),
                        identifier: id.to_string(),
                    }
                } else {
                    CoreError::from(e)
                }
            })?;
        debug!(entity = R::LABEL, %id, "deleted");
        Ok(())
    }

    // ── Local ────────────────────────────────────────────────────────

    pub fn clear_error(&self) {
        self.state.send_if_modified(|arc| {
            if arc.error.is_none() {
                return false;
            }
            Arc::make_mut(arc).error = None;
            true
        });
    }

    /// Drop everything, including any fetch still in flight.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.scope_epoch.fetch_add(1, Ordering::SeqCst);
        self.state
            .send_modify(|arc| *arc = Arc::new(ListState::default()));
    }
}
