//! Clap derive structures for the `canopy` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Also compiled by `build.rs` for man page generation, so this file may
//! only depend on clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// canopy -- forest and wildlife records from the command line
#[derive(Debug, Parser)]
#[command(
    name = "canopy",
    version,
    about = "Manage forest and wildlife tracking records",
    long_about = "Administer the animals, trees, plants, forest officers, visitors\n\
        and resources tracked by a forest management service.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// REST API base URL (overrides config)
    #[arg(long, env = "CANOPY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "CANOPY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "CANOPY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage animal species records
    #[command(alias = "an")]
    Animals(EntityArgs),

    /// Manage tree records
    Trees(EntityArgs),

    /// Manage plant records
    Plants(EntityArgs),

    /// Manage forest officers
    #[command(alias = "off")]
    Officers(EntityArgs),

    /// Manage visitor log entries
    Visitors(EntityArgs),

    /// Manage equipment and resources
    #[command(alias = "res")]
    Resources(EntityArgs),

    /// Log in and store the session
    Login(LoginArgs),

    /// Register a new admin account
    Signup(SignupArgs),

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Entity commands ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EntityArgs {
    #[command(subcommand)]
    pub command: EntityCommand,
}

#[derive(Debug, Subcommand)]
pub enum EntityCommand {
    /// List records, optionally filtered
    #[command(alias = "ls")]
    List(FilterArgs),

    /// Show one record
    Get {
        /// Record id
        id: u64,
    },

    /// Create a record
    #[command(alias = "create")]
    Add(WriteArgs),

    /// Edit every field of a record
    Edit {
        /// Record id
        id: u64,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Quick update of the reduced field set (animals and officers)
    Update {
        /// Record id
        id: u64,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: u64,
    },

    /// Summary statistics over the (filtered) list
    Stats(FilterArgs),

    /// Describe the editable fields
    Fields,
}

/// Server-side filters. Only the first non-empty one is applied, in the
/// order zone, status, type, date, date range.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Exact zone name
    #[arg(long)]
    pub zone: Option<String>,

    /// Conservation status (animals) or health status (trees)
    #[arg(long)]
    pub status: Option<String>,

    /// Resource type
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// Only plants with a medicinal use
    #[arg(long, conflicts_with_all = ["zone", "status", "kind", "date", "from", "to", "active"])]
    pub medicinal: bool,

    /// Only officers currently active
    #[arg(long, conflicts_with_all = ["zone", "status", "kind", "date", "from", "to"])]
    pub active: bool,

    /// Visit date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Start of a visit date range (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End of a visit date range (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct WriteArgs {
    /// Field assignment, repeatable (e.g. --set zone="Zone A")
    #[arg(long = "set", short = 's', value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// JSON object of field values
    #[arg(long, short = 'F', value_name = "PATH")]
    pub from_file: Option<PathBuf>,
}

// ── Auth commands ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account username (prompted if omitted)
    #[arg(long, short = 'u', env = "CANOPY_USERNAME")]
    pub username: Option<String>,

    /// Read the password from this variable instead of prompting
    #[arg(long, value_name = "VAR")]
    pub password_env: Option<String>,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Account username
    #[arg(long, short = 'u')]
    pub username: String,

    /// Contact email
    #[arg(long, short = 'e')]
    pub email: String,

    /// Read the password from this variable instead of prompting
    #[arg(long, value_name = "VAR")]
    pub password_env: Option<String>,

    /// Agree to the terms & conditions
    #[arg(long)]
    pub accept_terms: bool,
}

// ── Config commands ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config and session file locations
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
