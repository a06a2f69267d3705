// ── Slice state snapshot ──

use bizdesk_api::PageMeta;

use crate::model::EntityId;

/// Everything a list screen renders for one entity.
///
/// Published as an `Arc` through a `watch` channel; mutations copy on
/// write so snapshots already handed out never change underneath readers.
#[derive(Debug, Clone)]
pub struct ListState<R> {
    /// Rows of the most recently applied page, in server order.
    pub items: Vec<R>,
    /// Describes `items`. `None` before the first fetch or for unpaginated
    /// responses.
    pub pagination: Option<PageMeta>,
    pub is_loading: bool,
    /// Message from the last failed fetch.
    pub error: Option<String>,
    /// Record loaded by `fetch_one`.
    pub selected: Option<R>,
    /// Parent record the list is scoped to (integrations: the client).
    pub scope: Option<EntityId>,
}

impl<R> Default for ListState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
            is_loading: false,
            error: None,
            selected: None,
            scope: None,
        }
    }
}

impl<R> ListState<R> {
    /// The cached row with this id.
    ///
    /// Ids are compared in their string form since the same key may arrive
    /// as `42` in one payload and `"42"` in another.
    pub fn find(&self, id: &EntityId, id_of: impl Fn(&R) -> &EntityId) -> Option<&R> {
        let wanted = id.to_string();
        self.items.iter().find(|r| id_of(r).to_string() == wanted)
    }
}
