// ── Job card domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::reference::{ClientRef, EmployeeRef};

/// A unit of field or support work carried out for a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCard {
    pub id: EntityId,
    pub job_number: String,
    pub client_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_staff_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_staff: Option<EmployeeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl JobCard {
    pub fn client_name(&self) -> Option<&str> {
        self.client.as_ref().and_then(|c| c.company_name.as_deref())
    }

    pub fn support_staff_name(&self) -> Option<String> {
        self.support_staff
            .as_ref()
            .map(EmployeeRef::display_name)
            .filter(|n| !n.is_empty())
    }
}
