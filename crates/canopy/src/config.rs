//! CLI configuration: a thin wrapper around `canopy_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--api-url, --timeout, --output).

use clap::ValueEnum;

use canopy_core::{ApiClient, CoreError, Session};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Re-exports from shared crate ────────────────────────────────────

pub use canopy_config::{
    Config, SessionStore, config_path, load_config_or_default, save_config, session_path,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Everything a command needs to know about how to run and print.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

/// Merge the config file with global flags. Flags win.
pub fn resolve(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut config = load_config_or_default();

    if let Some(ref url) = global.api_url {
        config.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        config.defaults.timeout = timeout;
    }
    config.validate()?;

    let output = match global.output {
        Some(format) => format,
        None => parse_setting("output", &config.defaults.output)?,
    };
    let color = match global.color {
        Some(mode) => mode,
        None => parse_setting::<ColorMode>("color", &config.defaults.color)?,
    };

    Ok(Settings {
        output,
        color: output::should_color(color),
        quiet: global.quiet,
        yes: global.yes,
        config,
    })
}

fn parse_setting<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|reason| CliError::Validation {
        field: format!("defaults.{field}"),
        reason,
    })
}

/// Build the API client, carrying the stored session's token if any.
pub fn connect(settings: &Settings, session: Option<&Session>) -> Result<ApiClient, CliError> {
    let transport = settings.config.transport(session);
    ApiClient::new(&settings.config.api_url, &transport).map_err(|e| CliError::from(CoreError::from(e)))
}

/// The session left by `canopy login`, if it can be read.
pub fn stored_session() -> Option<Session> {
    SessionStore::default().load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable session file");
        None
    })
}
