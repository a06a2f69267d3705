//! Sales.

use std::fmt::Write;

use tabled::Tabled;

use bizdesk_core::Sale;

use crate::output::{self, text};

use super::crud::TableView;

#[derive(Tabled)]
pub struct SaleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Date")]
    date: String,
}

impl TableView for Sale {
    type Row = SaleRow;
    const ROUTE: &'static str = "/sales";
    const COMMAND: &'static str = "sales";

    fn row(&self) -> SaleRow {
        SaleRow {
            id: self.id.to_string(),
            number: self.sale_number.clone(),
            client: client_label(self),
            items: self.items.len(),
            total: output::money(self.total()),
            date: output::date(self.sale_date),
        }
    }

    fn detail(&self) -> String {
        let mut out = output::detail_lines(&[
            ("ID", self.id.to_string()),
            ("Number", self.sale_number.clone()),
            ("Client", client_label(self)),
            ("Date", output::date(self.sale_date)),
            ("Notes", text(self.notes.as_deref())),
            ("Total", output::money(self.total())),
        ]);
        if !self.items.is_empty() {
            out.push_str("\n\nItems:");
            for item in &self.items {
                let product = item
                    .product
                    .as_ref()
                    .and_then(|p| p.name.clone())
                    .unwrap_or_else(|| item.product_id.to_string());
                let _ = write!(
                    out,
                    "\n  {} × {product} @ {} = {}",
                    item.quantity,
                    output::money(item.unit_price),
                    output::money(item.line_total())
                );
            }
        }
        out
    }
}

fn client_label(sale: &Sale) -> String {
    sale.client_name()
        .map_or_else(|| sale.client_id.to_string(), str::to_owned)
}
