//! Command handlers, one module per command group.

pub mod auth;
pub mod categories;
pub mod clients;
pub mod config_cmd;
pub mod crud;
pub mod employees;
pub mod integrations;
pub mod job_cards;
pub mod products;
pub mod roles;
pub mod sales;
pub mod util;

use bizdesk_core::{
    Client, CoreError, Dashboard, Employee, GuardDecision, JobCard, Product, ProductCategory, Sale,
};

use crate::cli::{Command, GlobalOpts};
use crate::config::ActiveProfile;
use crate::error::CliError;
use crate::output;

/// Run a command that talks to the backend.
pub async fn dispatch(
    cmd: Command,
    active: &ActiveProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let dash = active.dashboard()?;

    let result = match cmd {
        Command::Login(args) => auth::login(&dash, active, args, global).await,
        Command::Logout => auth::logout(&dash, global),
        Command::Whoami => auth::whoami(&dash, global).await,
        Command::ForgotPassword { email } => auth::forgot_password(&dash, &email, global).await,
        Command::ChangePassword => auth::change_password(&dash, global).await,

        Command::Clients(args) => crud::handle::<Client>(&dash, args.command, None, global).await,
        Command::Employees(args) => {
            crud::handle::<Employee>(&dash, args.command, None, global).await
        }
        Command::Products(args) => crud::handle::<Product>(&dash, args.command, None, global).await,
        Command::Categories(args) => {
            crud::handle::<ProductCategory>(&dash, args.command, None, global).await
        }
        Command::Sales(args) => crud::handle::<Sale>(&dash, args.command, None, global).await,
        Command::JobCards(args) => crud::handle::<JobCard>(&dash, args.command, None, global).await,
        Command::Integrations(args) => integrations::handle(&dash, args, global).await,
        Command::Roles => roles::handle(&dash, global).await,

        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "local command routed to the backend".into(),
        )),
    };

    result.map_err(|e| e.in_context(&active.name, active.url()))
}

/// Run the route guard for `route`. A redirect to the login route means
/// there is no usable session.
pub async fn require_session(
    dash: &Dashboard,
    route: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spinner = output::spinner("Checking session…", global.quiet);
    let decision = dash.guard().evaluate(route).await;
    spinner.finish_and_clear();

    match decision {
        GuardDecision::Render => Ok(()),
        GuardDecision::Redirect(to) if to == dash.guard().routes().login => {
            Err(CliError::NotSignedIn {
                profile: String::new(),
            })
        }
        GuardDecision::Redirect(to) => {
            tracing::debug!(route, %to, "guard redirected away from protected route");
            Ok(())
        }
    }
}

/// Map a failure from a guarded command. A 401 ends the session.
pub fn on_failure(dash: &Dashboard, route: &str, err: CoreError) -> CliError {
    if err.is_unauthorized() {
        dash.guard().handle_unauthorized(route);
        return CliError::NotSignedIn {
            profile: String::new(),
        };
    }
    CliError::from(err)
}
