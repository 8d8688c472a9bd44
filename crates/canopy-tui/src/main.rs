//! `canopy-tui`: terminal console for forest and wildlife records.
//!
//! Built on [ratatui](https://ratatui.rs). After sign-in the dashboard
//! links to six management screens (wildlife, trees, plants, officers,
//! visitors, resources), reachable with number keys 1-7.
//!
//! Logs are written to a file (default `/tmp/canopy-tui.log`) so they never
//! corrupt the terminal. The session is shared with the `canopy` CLI.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use canopy_config::SessionStore;

use crate::app::App;

/// Terminal console for managing forest and wildlife tracking records.
#[derive(Parser, Debug)]
#[command(name = "canopy-tui", version, about)]
struct Cli {
    /// REST API root (e.g., http://localhost:8080/api)
    #[arg(short = 'u', long, env = "CANOPY_API_URL")]
    api_url: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/canopy-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing only; anything on stdout/stderr would corrupt the
/// TUI. The guard must live until exit so buffered lines get flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "canopy_tui={log_level},canopy_core={log_level},canopy_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("canopy-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches to raw mode.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    // Priority: CLI flag / env > config file > built-in default
    let mut config = canopy_config::load_config_or_default();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    config.validate()?;

    let store = SessionStore::default();
    let session = store.load().unwrap_or_else(|err| {
        warn!(error = %err, path = %store.path().display(), "ignoring unreadable session file");
        None
    });

    info!(
        api_url = %config.api_url,
        signed_in = session.is_some(),
        "starting canopy-tui"
    );

    let mut app = App::new(config, store, session);
    app.run().await?;

    Ok(())
}
