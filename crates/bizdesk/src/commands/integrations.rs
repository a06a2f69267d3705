//! Client integrations. Every operation works inside one client's scope.

use tabled::Tabled;

use bizdesk_core::{ClientIntegration, Dashboard, EntityId};

use crate::cli::{EntityCommand, GlobalOpts, IntegrationsArgs};
use crate::error::CliError;
use crate::output;

use super::crud::{self, TableView};

#[derive(Tabled)]
pub struct IntegrationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl TableView for ClientIntegration {
    type Row = IntegrationRow;
    const ROUTE: &'static str = "/integrations";
    const COMMAND: &'static str = "integrations";

    fn row(&self) -> IntegrationRow {
        IntegrationRow {
            id: self.id.to_string(),
            label: self.label.clone(),
            value: self.value.clone(),
        }
    }

    fn detail(&self) -> String {
        output::detail_lines(&[
            ("ID", self.id.to_string()),
            ("Client ID", self.client_id.to_string()),
            ("Label", self.label.clone()),
            ("Value", self.value.clone()),
        ])
    }
}

pub async fn handle(
    dash: &Dashboard,
    args: IntegrationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let scope = args.client.as_deref().map(EntityId::from);
    // `get` addresses a single record; everything else needs the client.
    if scope.is_none() && !matches!(args.command, EntityCommand::Get { .. }) {
        return Err(CliError::Validation {
            field: "client".into(),
            reason: "select a client with --client <ID>".into(),
        });
    }
    crud::handle::<ClientIntegration>(dash, args.command, scope, global).await
}
