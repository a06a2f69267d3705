//! Role lookup used when assigning employees.

use tabled::Tabled;

use bizdesk_core::{Dashboard, Role};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, text};

use super::{on_failure, require_session};

const ROUTE: &str = "/employees";

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Role> for RoleRow {
    fn from(r: &Role) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            description: text(r.description.as_deref()),
        }
    }
}

pub async fn handle(dash: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    require_session(dash, ROUTE, global).await?;

    let spinner = output::spinner("Loading roles…", global.quiet);
    let roles = dash.list_roles().await;
    spinner.finish_and_clear();
    let roles = roles.map_err(|e| on_failure(dash, ROUTE, e))?;

    let out = output::render_list(global.output, &roles, |r| RoleRow::from(r), |r| r.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
