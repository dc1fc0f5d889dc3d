//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.thinkers/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::navigator::DEFAULT_PAGE_BUDGET;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ThinkersConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub data_file: Option<String>,
    pub page_budget: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionsConfig {
    pub backend: Option<SessionBackend>,
    pub dir: Option<String>,
}

/// Where session views are kept between actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    Memory,
    File,
}

impl SessionBackend {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(SessionBackend::Memory),
            "file" => Some(SessionBackend::File),
            _ => None,
        }
    }
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DATA_FILE: &str = "data.json";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub data_file: PathBuf,
    pub page_budget: usize,
    pub session_backend: SessionBackend,
    pub sessions_dir: PathBuf,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub data_file: Option<PathBuf>,
    pub page_budget: Option<usize>,
    pub session_backend: Option<SessionBackend>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.thinkers`.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".thinkers"))
}

/// Returns the path to `~/.thinkers/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    home_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.thinkers/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ThinkersConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ThinkersConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(ThinkersConfig::default());
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ThinkersConfig::default());
    }

    load_config_from(&path)
}

/// Parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ThinkersConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ThinkersConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Thinkers Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# data_file = "data.json"            # Or set THINKERS_DATA_FILE env var
# page_budget = 1800                 # Characters per biography page (THINKERS_PAGE_BUDGET)

# [sessions]
# backend = "memory"                 # "memory" or "file" (THINKERS_SESSIONS)
# dir = "/home/me/.thinkers/sessions"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ThinkersConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with an injectable environment, so tests don't touch the
/// process environment.
fn resolve_with_env(
    config: &ThinkersConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Data file: CLI → env → config → default
    let data_file = cli
        .data_file
        .clone()
        .or_else(|| env("THINKERS_DATA_FILE").map(PathBuf::from))
        .or_else(|| config.general.data_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

    // Page budget: CLI → env → config → default, zero is never valid
    let env_budget = env("THINKERS_PAGE_BUDGET").and_then(|s| match s.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("Ignoring THINKERS_PAGE_BUDGET={s:?}: {e}");
            None
        }
    });
    let page_budget = match cli.page_budget.or(env_budget).or(config.general.page_budget) {
        Some(0) => {
            warn!("Page budget must be positive, using {DEFAULT_PAGE_BUDGET}");
            DEFAULT_PAGE_BUDGET
        }
        Some(n) => n,
        None => DEFAULT_PAGE_BUDGET,
    };

    // Session backend: CLI → env → config → default
    let session_backend = cli
        .session_backend
        .or_else(|| env("THINKERS_SESSIONS").and_then(|s| SessionBackend::parse(&s)))
        .or(config.sessions.backend)
        .unwrap_or_default();

    let sessions_dir = config
        .sessions
        .dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|d| d.join("sessions")))
        .unwrap_or_else(|| PathBuf::from(".thinkers-sessions"));

    ResolvedConfig {
        data_file,
        page_budget,
        session_backend,
        sessions_dir,
    }
}
