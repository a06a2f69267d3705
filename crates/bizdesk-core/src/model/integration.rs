// ── Client integration credentials ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A free-text label/value credential pair scoped to one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIntegration {
    pub id: EntityId,
    pub client_id: EntityId,
    pub label: String,
    pub value: String,
}
