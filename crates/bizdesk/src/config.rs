//! CLI configuration: a thin layer over `bizdesk_config`.
//!
//! Adds flag overrides (`--api-url`, `--insecure`, `--timeout`) on top of
//! the stored profile and builds the `Dashboard` for the active profile.

use bizdesk_core::{ClientConfig, Dashboard, FileSessionStorage};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use bizdesk_config::{
    Config, Profile, config_path, load_config, profile_to_client_config, resolve_email,
    resolve_password, save_config, session_path, store_password,
};

/// Profile selected for this invocation, after flag overrides.
#[derive(Debug)]
pub struct ActiveProfile {
    pub name: String,
    pub profile: Profile,
    pub client: ClientConfig,
}

impl ActiveProfile {
    /// Data layer for this profile, with its session persisted on disk.
    pub fn dashboard(&self) -> Result<Dashboard, CliError> {
        let storage = FileSessionStorage::new(session_path(&self.name));
        Ok(Dashboard::new(self.client.clone(), storage)?)
    }

    pub fn url(&self) -> &str {
        self.client.api_url.as_str()
    }
}

/// Resolve the active profile name from flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Comma-separated profile names for error help.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

pub fn resolve(global: &GlobalOpts) -> Result<ActiveProfile, CliError> {
    let cfg = load_config()?;
    let name = active_profile_name(global, &cfg);

    let mut profile = match (cfg.profiles.get(&name), &global.api_url) {
        (Some(profile), _) => profile.clone(),
        (None, Some(_)) => Profile::default(),
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(&cfg),
                name,
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(url) = &global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }

    let client = profile_to_client_config(&profile, &cfg.defaults)?;
    tracing::debug!(profile = %name, url = %client.api_url, "resolved profile");
    Ok(ActiveProfile {
        name,
        profile,
        client,
    })
}
