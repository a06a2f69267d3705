//! Employees.

use tabled::Tabled;

use bizdesk_core::Employee;

use crate::output::{self, text};

use super::crud::TableView;

#[derive(Tabled)]
pub struct EmployeeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl TableView for Employee {
    type Row = EmployeeRow;
    const ROUTE: &'static str = "/employees";
    const COMMAND: &'static str = "employees";

    fn row(&self) -> EmployeeRow {
        EmployeeRow {
            id: self.id.to_string(),
            name: self.full_name(),
            email: self.email.clone(),
            position: text(self.position.as_deref()),
            department: text(self.department.as_deref()),
            role: text(self.role_name()),
        }
    }

    fn detail(&self) -> String {
        let active = match self.is_active {
            Some(true) => "yes",
            Some(false) => "no",
            None => "",
        };
        output::detail_lines(&[
            ("ID", self.id.to_string()),
            ("Name", self.full_name()),
            ("Email", self.email.clone()),
            ("Phone", text(self.phone.as_deref())),
            ("Position", text(self.position.as_deref())),
            ("Department", text(self.department.as_deref())),
            (
                "Role",
                self.role_name()
                    .map(str::to_owned)
                    .or_else(|| self.role_id.as_ref().map(ToString::to_string))
                    .unwrap_or_default(),
            ),
            ("Active", active.to_owned()),
            ("Created", output::datetime(self.created_at)),
        ])
    }
}
