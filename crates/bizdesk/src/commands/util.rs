//! Shared helpers for command handlers.

use std::io::IsTerminal;

use serde_json::Value;

use crate::cli::PayloadArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').to_owned(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Read the JSON object given by `--data` or `--from-file`.
pub fn read_payload(args: &PayloadArgs) -> Result<Value, CliError> {
    let (source, text) = match (&args.data, &args.from_file) {
        (Some(data), _) => ("data", data.clone()),
        (None, Some(path)) => ("from-file", std::fs::read_to_string(path)?),
        (None, None) => {
            return Err(CliError::Validation {
                field: "data".into(),
                reason: "pass --data or --from-file".into(),
            });
        }
    };
    let value: Value = serde_json::from_str(&text).map_err(|e| CliError::Validation {
        field: source.into(),
        reason: format!("invalid JSON: {e}"),
    })?;
    if !value.is_object() {
        return Err(CliError::Validation {
            field: source.into(),
            reason: "expected a JSON object".into(),
        });
    }
    Ok(value)
}

/// Set `key` unless the payload already carries it.
pub fn default_field(payload: &mut Value, key: &str, value: impl Into<Value>) {
    if let Some(map) = payload.as_object_mut() {
        map.entry(key).or_insert_with(|| value.into());
    }
}

pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
