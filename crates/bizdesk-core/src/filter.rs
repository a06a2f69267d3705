// ── Client-side search ──
//
// Page search narrows the rows already on screen. It is a pure,
// case-insensitive substring match and never touches server pagination.

use crate::model::{
    Client, ClientIntegration, Employee, JobCard, Product, ProductCategory, Sale,
};

/// The fields a page search looks at for one record.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match against any search field.
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Rows whose search fields contain `term`. A blank term returns all rows.
pub fn filter_items<'a, R: Searchable>(items: &'a [R], term: &str) -> Vec<&'a R> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.matches(&needle)).collect()
}

fn present<'a>(fields: impl IntoIterator<Item = Option<&'a str>>) -> Vec<&'a str> {
    fields.into_iter().flatten().collect()
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        present([
            Some(self.company_name.as_str()),
            self.contact_person.as_deref(),
            self.email.as_deref(),
            self.phone.as_deref(),
            self.city.as_deref(),
            self.country.as_deref(),
        ])
    }
}

impl Searchable for Employee {
    fn search_fields(&self) -> Vec<&str> {
        present([
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(self.email.as_str()),
            self.position.as_deref(),
            self.department.as_deref(),
            self.phone.as_deref(),
        ])
    }
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        present([
            Some(self.name.as_str()),
            self.description.as_deref(),
            self.sku.as_deref(),
            self.barcode.as_deref(),
            self.supplier.as_deref(),
            self.category_name(),
        ])
    }
}

impl Searchable for ProductCategory {
    fn search_fields(&self) -> Vec<&str> {
        present([
            Some(self.name.as_str()),
            self.description.as_deref(),
            Some(self.status.as_str()),
        ])
    }
}

impl Searchable for Sale {
    fn search_fields(&self) -> Vec<&str> {
        present([Some(self.sale_number.as_str()), self.client_name()])
    }
}

impl Searchable for JobCard {
    fn search_fields(&self) -> Vec<&str> {
        let staff = self.support_staff.as_ref();
        present([
            Some(self.job_number.as_str()),
            self.purpose.as_deref(),
            self.location.as_deref(),
            self.client_name(),
            staff.and_then(|s| s.first_name.as_deref()),
            staff.and_then(|s| s.last_name.as_deref()),
        ])
    }

    // Staff name is matched as "First Last" so a full-name search hits.
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
            || self
                .support_staff_name()
                .is_some_and(|name| name.to_lowercase().contains(needle))
    }
}

impl Searchable for ClientIntegration {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.label.as_str(), self.value.as_str()]
    }
}
