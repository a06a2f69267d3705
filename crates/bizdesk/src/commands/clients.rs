//! Client companies.

use tabled::Tabled;

use bizdesk_core::Client;

use crate::output::{self, text};

use super::crud::TableView;

#[derive(Tabled)]
pub struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Contact")]
    contact: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "City")]
    city: String,
}

impl TableView for Client {
    type Row = ClientRow;
    const ROUTE: &'static str = "/clients";
    const COMMAND: &'static str = "clients";

    fn row(&self) -> ClientRow {
        ClientRow {
            id: self.id.to_string(),
            company: self.company_name.clone(),
            contact: text(self.contact_person.as_deref()),
            email: text(self.email.as_deref()),
            phone: text(self.phone.as_deref()),
            city: text(self.city.as_deref()),
        }
    }

    fn detail(&self) -> String {
        output::detail_lines(&[
            ("ID", self.id.to_string()),
            ("Company", self.company_name.clone()),
            ("Contact", text(self.contact_person.as_deref())),
            ("Email", text(self.email.as_deref())),
            ("Phone", text(self.phone.as_deref())),
            ("Address", text(self.address.as_deref())),
            ("City", text(self.city.as_deref())),
            ("Country", text(self.country.as_deref())),
            ("Created", output::datetime(self.created_at)),
            ("Updated", output::datetime(self.updated_at)),
        ])
    }
}
