//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, OutputFormat};
use crate::config::{self, Config, Settings};
use crate::error::CliError;
use crate::output;

use super::util;

const OUTPUTS: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];
const COLORS: &[&str] = &["auto", "always", "never"];

pub fn handle(args: ConfigArgs, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(settings),

        ConfigCommand::Show => {
            let out = match settings.output {
                OutputFormat::Table | OutputFormat::Plain => {
                    format_config(&settings.config)
                }
                OutputFormat::Yaml => serde_yaml::to_string(&settings.config)?,
                OutputFormat::JsonCompact => serde_json::to_string(&settings.config)?,
                OutputFormat::Json => {
                    serde_json::to_string_pretty(&settings.config)?
                }
            };
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let out = format!(
                "config:  {}\nsession: {}",
                config::config_path().display(),
                config::session_path().display()
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }
    }
}

fn init(settings: &Settings) -> Result<(), CliError> {
    let path = config::config_path();
    if path.exists() && !util::confirm(
        &format!("Overwrite existing config at {}?", path.display()),
        "config init",
        settings,
    )? {
        return Ok(());
    }

    let current = &settings.config;
    let api_url: String = Input::new()
        .with_prompt("API base URL")
        .default(current.api_url.clone())
        .interact_text()
        .map_err(util::prompt_err)?;
    let timeout: u64 = Input::new()
        .with_prompt("Request timeout (seconds)")
        .default(current.defaults.timeout)
        .interact_text()
        .map_err(util::prompt_err)?;
    let output = Select::new()
        .with_prompt("Default output format")
        .items(OUTPUTS)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    let color = Select::new()
        .with_prompt("Color output")
        .items(COLORS)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;

    let mut cfg = Config {
        api_url,
        ..Config::default()
    };
    cfg.defaults.timeout = timeout;
    OUTPUTS[output].clone_into(&mut cfg.defaults.output);
    COLORS[color].clone_into(&mut cfg.defaults.color);
    cfg.validate()?;

    config::save_config(&cfg)?;
    if !settings.quiet {
        eprintln!("Config written to {}", path.display());
    }
    Ok(())
}

fn format_config(cfg: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "api_url = \"{}\"", cfg.api_url);
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = write!(out, "timeout = {}", cfg.defaults.timeout);
    out
}
