//! Shared configuration for the canopy CLI and TUI.
//!
//! TOML file + `CANOPY_*` environment layering, plus the on-disk session
//! left behind by `login`. Both binaries depend on this crate; the CLI
//! applies its own flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use canopy_core::{AuthUser, Session, TransportConfig};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL used when neither the file nor the environment sets one.
pub const DEFAULT_API_URL: &str = canopy_core::DEFAULT_BASE_URL;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("session file is corrupt: {0}")]
    Session(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// REST API root, e.g. `http://localhost:8080/api`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            defaults: Defaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Check the base URL parses before any request is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.api_url).map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.defaults.timeout)
    }

    /// Transport settings for this config and an optional session.
    pub fn transport(&self, session: Option<&Session>) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(self.timeout())
            .with_bearer_token(session.and_then(|s| s.token.clone()))
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "canopy", "canopy")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("canopy");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the logged-in session is kept between runs.
pub fn session_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("session.json"),
        |dirs| dirs.data_dir().join("session.json"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Layer defaults, the TOML file at `path`, then `CANOPY_*` variables.
///
/// `CANOPY_API_URL` overrides the base URL; nested keys use a double
/// underscore (`CANOPY_DEFAULTS__TIMEOUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CANOPY_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default configuration");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Session persistence ─────────────────────────────────────────────

/// Keyring service holding the bearer token.
const KEYRING_SERVICE: &str = "canopy";
const KEYRING_ACCOUNT: &str = "session-token";

/// On-disk form of a `Session`. The token never goes in here.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    user: AuthUser,
    logged_in_at: DateTime<Utc>,
}

/// The current session: user details in a JSON file, the bearer token in
/// the OS keyring.
///
/// When the keyring is disabled or unavailable the token goes to a
/// sibling `.token` file readable only by its owner.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    use_keyring: bool,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(session_path()).with_keyring()
    }
}

impl SessionStore {
    /// File-only store; the token lands in the owner-only token file.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            use_keyring: false,
        }
    }

    /// Prefer the OS keyring for the token.
    #[must_use]
    pub fn with_keyring(mut self) -> Self {
        self.use_keyring = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fallback location for the token, next to the session file.
    pub fn token_path(&self) -> PathBuf {
        self.path.with_extension("token")
    }

    /// Read the stored session; a missing file means logged out.
    pub fn load(&self) -> Result<Option<Session>, ConfigError> {
        let Some(raw) = read_optional(&self.path)? else {
            return Ok(None);
        };
        let stored: StoredSession = serde_json::from_str(&raw)?;
        let token = self.load_token()?;
        Ok(Some(Session {
            user: stored.user,
            token: token.map(SecretString::from),
            logged_in_at: stored.logged_in_at,
        }))
    }

    pub fn save(&self, session: &Session) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredSession {
            user: session.user.clone(),
            logged_in_at: session.logged_in_at,
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;

        match &session.token {
            Some(token) => self.save_token(token.expose_secret())?,
            None => self.clear_token()?,
        }
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the session file and token. Clearing an absent session is
    /// not an error.
    pub fn clear(&self) -> Result<(), ConfigError> {
        remove_optional(&self.path)?;
        self.clear_token()
    }

    fn keyring_entry(&self) -> Option<keyring::Entry> {
        if !self.use_keyring {
            return None;
        }
        keyring::Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)
            .inspect_err(|e| tracing::debug!(error = %e, "keyring unavailable"))
            .ok()
    }

    fn load_token(&self) -> Result<Option<String>, ConfigError> {
        if let Some(entry) = self.keyring_entry() {
            match entry.get_password() {
                Ok(token) => return Ok(Some(token)),
                Err(keyring::Error::NoEntry) => {}
                Err(e) => tracing::debug!(error = %e, "keyring read failed, trying token file"),
            }
        }
        Ok(read_optional(&self.token_path())?.map(|t| t.trim().to_owned()))
    }

    fn save_token(&self, token: &str) -> Result<(), ConfigError> {
        if let Some(entry) = self.keyring_entry() {
            match entry.set_password(token) {
                Ok(()) => return remove_optional(&self.token_path()),
                Err(e) => tracing::warn!(error = %e, "keyring write failed, using token file"),
            }
        }
        write_owner_only(&self.token_path(), token)?;
        Ok(())
    }

    fn clear_token(&self) -> Result<(), ConfigError> {
        if let Some(entry) = self.keyring_entry() {
            match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => tracing::debug!(error = %e, "keyring delete failed"),
            }
        }
        remove_optional(&self.token_path())
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn remove_optional(path: &Path) -> Result<(), ConfigError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Write `contents` to a file only its owner can read (0600 on unix).
fn write_owner_only(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::io::Write;

    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(path)?;
    // `mode` only applies on creation; tighten a pre-existing file too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}
