// ── Sale domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::reference::{ClientRef, ProductRef};

/// One line of a sale, in the order the user entered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub product_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductRef>,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
}

impl SaleItem {
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: EntityId,
    pub sale_number: String,
    pub client_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Sale {
    /// Sum of every line's quantity × unit price.
    pub fn total(&self) -> f64 {
        self.items.iter().map(SaleItem::line_total).sum()
    }

    pub fn client_name(&self) -> Option<&str> {
        self.client.as_ref().and_then(|c| c.company_name.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_lines_in_order() {
        let sale: Sale = serde_json::from_str(
            r#"{
                "id": 3,
                "saleNumber": "S-0003",
                "clientId": 9,
                "items": [
                    {"productId": 1, "quantity": 2, "unitPrice": 2.5},
                    {"productId": 2, "quantity": 1, "unitPrice": 10.0}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(sale.items[0].product_id, EntityId::Numeric(1));
        assert!((sale.total() - 15.0).abs() < f64::EPSILON);
    }
}
