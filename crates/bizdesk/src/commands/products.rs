//! Products.

use tabled::Tabled;

use bizdesk_core::Product;

use crate::output::{self, text};

use super::crud::TableView;

#[derive(Tabled)]
pub struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Supplier")]
    supplier: String,
}

impl TableView for Product {
    type Row = ProductRow;
    const ROUTE: &'static str = "/products";
    const COMMAND: &'static str = "products";

    fn row(&self) -> ProductRow {
        ProductRow {
            id: self.id.to_string(),
            name: self.name.clone(),
            sku: text(self.sku.as_deref()),
            category: text(self.category_name()),
            price: self.price.map(output::money).unwrap_or_default(),
            supplier: text(self.supplier.as_deref()),
        }
    }

    fn detail(&self) -> String {
        output::detail_lines(&[
            ("ID", self.id.to_string()),
            ("Name", self.name.clone()),
            ("Description", text(self.description.as_deref())),
            ("SKU", text(self.sku.as_deref())),
            ("Barcode", text(self.barcode.as_deref())),
            ("Supplier", text(self.supplier.as_deref())),
            ("Price", self.price.map(output::money).unwrap_or_default()),
            ("Category", text(self.category_name())),
        ])
    }
}
