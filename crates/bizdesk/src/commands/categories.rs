//! Product categories.

use tabled::Tabled;

use bizdesk_core::ProductCategory;

use crate::output::{self, text};

use super::crud::TableView;

#[derive(Tabled)]
pub struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Description")]
    description: String,
}

impl TableView for ProductCategory {
    type Row = CategoryRow;
    const ROUTE: &'static str = "/product-categories";
    const COMMAND: &'static str = "categories";

    fn row(&self) -> CategoryRow {
        CategoryRow {
            id: self.id.to_string(),
            name: self.name.clone(),
            status: self.status.as_str(),
            description: text(self.description.as_deref()),
        }
    }

    fn detail(&self) -> String {
        output::detail_lines(&[
            ("ID", self.id.to_string()),
            ("Name", self.name.clone()),
            ("Status", self.status.as_str().to_owned()),
            ("Description", text(self.description.as_deref())),
        ])
    }
}
