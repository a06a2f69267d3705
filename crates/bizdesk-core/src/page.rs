// ── Page container ──
//
// Screen-local state for one entity list: current page, search term, and
// the create/edit/delete dialog. Mutations go through the slice and are
// followed by exactly one refetch of the current page.

use std::sync::Arc;

use bizdesk_api::PageMeta;
use tracing::debug;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::CoreError;
use crate::filter::filter_items;
use crate::model::EntityId;
use crate::resource::Resource;
use crate::store::{FetchOutcome, ListState, Slice};
use crate::validate::FieldErrors;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DialogMode<R> {
    #[default]
    Closed,
    Create,
    Edit(R),
    ConfirmDelete(R),
}

/// Dialog state, kept apart from the slice so a failed save never shows
/// up as a list error.
#[derive(Debug, Clone)]
pub struct Dialog<R> {
    pub mode: DialogMode<R>,
    pub error: Option<String>,
    pub field_errors: FieldErrors,
}

impl<R> Default for Dialog<R> {
    fn default() -> Self {
        Self {
            mode: DialogMode::Closed,
            error: None,
            field_errors: FieldErrors::default(),
        }
    }
}

impl<R> Dialog<R> {
    pub fn is_open(&self) -> bool {
        !matches!(self.mode, DialogMode::Closed)
    }
}

pub struct PageContainer<R: Resource> {
    slice: Arc<Slice<R>>,
    page: u32,
    limit: u32,
    search: String,
    dialog: Dialog<R>,
}

impl<R: Resource> PageContainer<R> {
    pub fn new(slice: Arc<Slice<R>>) -> Self {
        Self::with_limit(slice, DEFAULT_PAGE_SIZE)
    }

    pub fn with_limit(slice: Arc<Slice<R>>, limit: u32) -> Self {
        Self {
            slice,
            page: 1,
            limit: limit.max(1),
            search: String::new(),
            dialog: Dialog::default(),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    pub async fn mount(&mut self) -> Result<FetchOutcome, CoreError> {
        self.refetch().await
    }

    pub fn unmount(&self) {
        self.slice.clear_error();
    }

    async fn refetch(&self) -> Result<FetchOutcome, CoreError> {
        self.slice.fetch_list(self.page, self.limit).await
    }

    // ── Pagination ───────────────────────────────────────────────────

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub async fn set_page(&mut self, page: u32) -> Result<FetchOutcome, CoreError> {
        self.page = page.max(1);
        self.refetch().await
    }

    /// Advance one page, if the last response says there is one.
    pub async fn next_page(&mut self) -> Result<FetchOutcome, CoreError> {
        let last = self
            .slice
            .snapshot()
            .pagination
            .as_ref()
            .map_or(u64::from(self.page), PageMeta::page_count);
        if u64::from(self.page) >= last {
            return Ok(FetchOutcome::Skipped);
        }
        self.set_page(self.page + 1).await
    }

    pub async fn prev_page(&mut self) -> Result<FetchOutcome, CoreError> {
        if self.page <= 1 {
            return Ok(FetchOutcome::Skipped);
        }
        self.set_page(self.page - 1).await
    }

    // ── Search ───────────────────────────────────────────────────────

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn state(&self) -> Arc<ListState<R>> {
        self.slice.snapshot()
    }

    /// Rows on the current page that match the search term.
    pub fn visible_rows(&self) -> Vec<R> {
        let state = self.slice.snapshot();
        filter_items(&state.items, &self.search)
            .into_iter()
            .cloned()
            .collect()
    }

    // ── Scope ────────────────────────────────────────────────────────

    /// Integrations: show the rows belonging to `client_id`.
    pub async fn select_client(&mut self, client_id: EntityId) -> Result<FetchOutcome, CoreError> {
        self.page = 1;
        self.slice.select_scope(client_id, self.limit).await
    }

    // ── Dialog ───────────────────────────────────────────────────────

    pub fn dialog(&self) -> &Dialog<R> {
        &self.dialog
    }

    fn open(&mut self, mode: DialogMode<R>) {
        self.dialog = Dialog {
            mode,
            ..Dialog::default()
        };
    }

    pub fn open_create(&mut self) {
        self.open(DialogMode::Create);
    }

    pub async fn open_edit(&mut self, id: &EntityId) -> Result<(), CoreError> {
        let record = self.find(id).await?;
        self.open(DialogMode::Edit(record));
        Ok(())
    }

    pub async fn open_delete(&mut self, id: &EntityId) -> Result<(), CoreError> {
        let record = self.find(id).await?;
        self.open(DialogMode::ConfirmDelete(record));
        Ok(())
    }

    pub fn close_dialog(&mut self) {
        self.dialog = Dialog::default();
    }

    /// A row from the current page, or the server's copy.
    ///
    /// A failed lookup is reported on the dialog; the list stays as it was.
    async fn find(&mut self, id: &EntityId) -> Result<R, CoreError> {
        self.close_dialog();
        let cached = self.slice.snapshot().find(id, R::id).cloned();
        match cached {
            Some(record) => Ok(record),
            None => match self.slice.fetch_one(id).await {
                Ok(record) => Ok(record),
                Err(e) => Err(self.reject(e)),
            },
        }
    }

    fn begin_submit(&mut self) {
        self.slice.clear_error();
        self.dialog.error = None;
        self.dialog.field_errors = FieldErrors::default();
    }

    /// Keep the dialog open and show why the save failed.
    fn reject(&mut self, err: CoreError) -> CoreError {
        match &err {
            CoreError::Validation { errors } => self.dialog.field_errors = errors.clone(),
            other => self.dialog.error = Some(other.to_string()),
        }
        err
    }

    /// Refresh the current page, then close the dialog.
    async fn finish(&mut self) {
        if let Err(e) = self.refetch().await {
            debug!(entity = R::LABEL, error = %e, "refetch after save failed");
        }
        self.close_dialog();
    }

    pub async fn submit_create(&mut self, data: &R::Create) -> Result<R, CoreError> {
        if !matches!(self.dialog.mode, DialogMode::Create) {
            return Err(dialog_not_open("create"));
        }
        self.begin_submit();
        match self.slice.create(data).await {
            Ok(record) => {
                self.finish().await;
                Ok(record)
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    pub async fn submit_update(&mut self, data: &R::Update) -> Result<R, CoreError> {
        let DialogMode::Edit(record) = &self.dialog.mode else {
            return Err(dialog_not_open("edit"));
        };
        let id = record.id().clone();
        self.begin_submit();
        match self.slice.update(&id, data).await {
            Ok(record) => {
                self.finish().await;
                Ok(record)
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    pub async fn confirm_delete(&mut self) -> Result<(), CoreError> {
        let DialogMode::ConfirmDelete(record) = &self.dialog.mode else {
            return Err(dialog_not_open("delete"));
        };
        let id = record.id().clone();
        self.begin_submit();
        match self.slice.delete(&id).await {
            Ok(()) => {
                self.finish().await;
                Ok(())
            }
            Err(e) => Err(self.reject(e)),
        }
    }
}

fn dialog_not_open(which: &str) -> CoreError {
    CoreError::Internal(format!("no {which} dialog is open"))
}
