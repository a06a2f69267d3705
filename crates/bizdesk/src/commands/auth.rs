//! Sign-in, sign-out, and account commands.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::SecretString;

use bizdesk_config::ConfigError;
use bizdesk_core::{AuthUser, ChangePasswordRequest, Dashboard, GuardDecision, LoginRequest};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::{self, ActiveProfile};
use crate::error::CliError;
use crate::output;

use super::{require_session, util};

const LOGIN_ROUTE: &str = "/login";
const PROFILE_ROUTE: &str = "/profile";

// ── Login / logout ──────────────────────────────────────────────────

pub async fn login(
    dash: &Dashboard,
    active: &ActiveProfile,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !args.force {
        let spinner = output::spinner("Checking session…", global.quiet);
        let decision = dash.guard().evaluate(LOGIN_ROUTE).await;
        spinner.finish_and_clear();
        if matches!(decision, GuardDecision::Redirect(_)) {
            let who = dash
                .session()
                .user()
                .map_or_else(|| "current user".into(), |u| u.display_name());
            output::success(
                &format!("Already signed in as {who} (use --force to sign in again)"),
                global.color,
                global.quiet,
            );
            return Ok(());
        }
    }

    let email = match args.email {
        Some(email) => email,
        None => match config::resolve_email(&active.profile, &active.name) {
            Ok(email) => email,
            Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
                Input::new()
                    .with_prompt("Email")
                    .interact_text()
                    .map_err(util::prompt_err)?
            }
            Err(e) => return Err(e.into()),
        },
    };

    let password = match config::resolve_password(&active.profile, &active.name) {
        Ok(password) => password,
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            SecretString::from(rpassword::prompt_password("Password: ").map_err(util::prompt_err)?)
        }
        Err(e) => return Err(e.into()),
    };

    let spinner = output::spinner("Signing in…", global.quiet);
    let result = dash.auth().login(&LoginRequest { email, password }).await;
    spinner.finish_and_clear();
    let user = result?;

    output::success(
        &format!("Signed in as {}", user.display_name()),
        global.color,
        global.quiet,
    );
    Ok(())
}

pub fn logout(dash: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    dash.auth().logout()?;
    output::success("Signed out", global.color, global.quiet);
    Ok(())
}

// ── Account ─────────────────────────────────────────────────────────

fn user_detail(user: &AuthUser) -> String {
    output::detail_lines(&[
        ("ID", user.id.to_string()),
        ("Name", user.display_name()),
        ("Email", user.email.clone()),
        (
            "Role",
            output::text(user.role.as_ref().and_then(|r| r.name.as_deref())),
        ),
    ])
}

pub async fn whoami(dash: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    require_session(dash, PROFILE_ROUTE, global).await?;
    let user = dash.session().user().ok_or_else(|| CliError::NotSignedIn {
        profile: String::new(),
    })?;
    let out = output::render_single(global.output, &user, user_detail, |u| u.email.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn forgot_password(
    dash: &Dashboard,
    email: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spinner = output::spinner("Requesting reset…", global.quiet);
    let result = dash.auth().forgot_password(email).await;
    spinner.finish_and_clear();
    result?;
    output::success(
        &format!("If {} has an account, a reset link is on its way", email.trim()),
        global.color,
        global.quiet,
    );
    Ok(())
}

pub async fn change_password(dash: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    require_session(dash, PROFILE_ROUTE, global).await?;

    let current = rpassword::prompt_password("Current password: ").map_err(util::prompt_err)?;
    let new = rpassword::prompt_password("New password: ").map_err(util::prompt_err)?;
    let repeat = rpassword::prompt_password("Repeat new password: ").map_err(util::prompt_err)?;
    if new != repeat {
        return Err(CliError::Validation {
            field: "newPassword".into(),
            reason: "passwords do not match".into(),
        });
    }

    let request = ChangePasswordRequest {
        current_password: SecretString::from(current),
        new_password: SecretString::from(new),
    };
    let spinner = output::spinner("Updating password…", global.quiet);
    let result = dash.auth().change_password(&request).await;
    spinner.finish_and_clear();
    result?;

    output::success("Password changed", global.color, global.quiet);
    Ok(())
}
