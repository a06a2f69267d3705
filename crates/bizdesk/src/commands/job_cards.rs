//! Job cards.

use tabled::Tabled;

use bizdesk_core::JobCard;

use crate::output::{self, text};

use super::crud::TableView;

#[derive(Tabled)]
pub struct JobCardRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Job #")]
    number: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Purpose")]
    purpose: String,
    #[tabled(rename = "Staff")]
    staff: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Scheduled")]
    scheduled: String,
}

impl TableView for JobCard {
    type Row = JobCardRow;
    const ROUTE: &'static str = "/job-cards";
    const COMMAND: &'static str = "job-cards";

    fn row(&self) -> JobCardRow {
        JobCardRow {
            id: self.id.to_string(),
            number: self.job_number.clone(),
            client: self
                .client_name()
                .map_or_else(|| self.client_id.to_string(), str::to_owned),
            purpose: text(self.purpose.as_deref()),
            staff: self.support_staff_name().unwrap_or_default(),
            status: text(self.status.as_deref()),
            scheduled: output::date(self.scheduled_for),
        }
    }

    fn detail(&self) -> String {
        output::detail_lines(&[
            ("ID", self.id.to_string()),
            ("Job #", self.job_number.clone()),
            ("Client", text(self.client_name())),
            ("Client ID", self.client_id.to_string()),
            ("Purpose", text(self.purpose.as_deref())),
            ("Location", text(self.location.as_deref())),
            ("Staff", self.support_staff_name().unwrap_or_default()),
            ("Status", text(self.status.as_deref())),
            ("Scheduled", output::datetime(self.scheduled_for)),
        ])
    }
}
