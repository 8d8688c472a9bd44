//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};

use crate::config::Settings;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, `--yes` is mandatory.
pub fn confirm(message: &str, action: &str, settings: &Settings) -> Result<bool, CliError> {
    if settings.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.to_owned(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Read a JSON object for `--from-file` flags.
pub fn read_json_object(path: &Path) -> Result<Map<String, Value>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    match serde_json::from_str(&contents)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::Validation {
            field: "from-file".into(),
            reason: "expected a JSON object of field values".into(),
        }),
    }
}

/// Split a `--set key=value` assignment.
pub fn split_assignment(raw: &str) -> Result<(&str, &str), CliError> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim(), value))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| CliError::Validation {
            field: "set".into(),
            reason: format!("expected KEY=VALUE, got '{raw}'"),
        })
}

/// Await `fut` behind a stderr spinner when a human is watching.
pub async fn with_spinner<F: Future>(settings: &Settings, message: String, fut: F) -> F::Output {
    if settings.quiet || !std::io::stderr().is_terminal() {
        return fut.await;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));

    let out = fut.await;
    spinner.finish_and_clear();
    out
}

/// Read a password from the named variable, or prompt for it.
pub fn read_password(prompt: &str, env_var: Option<&str>) -> Result<String, CliError> {
    match env_var {
        Some(var) => std::env::var(var).map_err(|_| CliError::Validation {
            field: "password-env".into(),
            reason: format!("environment variable {var} is not set"),
        }),
        None => rpassword::prompt_password(prompt).map_err(prompt_err),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_the_first_equals() {
        assert_eq!(split_assignment("zone=Zone A").unwrap(), ("zone", "Zone A"));
        assert_eq!(split_assignment("notes=a=b").unwrap(), ("notes", "a=b"));
        assert_eq!(split_assignment("count=").unwrap(), ("count", ""));
        assert!(split_assignment("zone").is_err());
        assert!(split_assignment("=x").is_err());
    }

    #[test]
    fn from_file_requires_an_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(&path, r#"{"commonName":"Oak","heightMeters":12.5}"#).unwrap();
        let map = read_json_object(&path).unwrap();
        assert_eq!(map["commonName"], "Oak");

        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            read_json_object(&path),
            Err(CliError::Validation { .. })
        ));
    }
}
