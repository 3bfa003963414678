//! # ab-config
//!
//! Layered runtime settings for anonboard.
//!
//! Precedence, lowest first:
//! 1. built-in defaults
//! 2. `anonboard.toml` in the working directory (or the file named by `ANONBOARD_CONFIG`)
//! 3. `ANONBOARD__*` environment variables, `__` separating sections
//!    (e.g. `ANONBOARD__SERVER__PORT=3000`)
//! 4. the conventional `DB_URI` and `PORT` variables
//!
//! A `.env` file, if present, is read into the environment before any of this.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "anonboard.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub log: LogSettings,
    /// Directory holding `index.html`, `board.html` and `thread.html`
    pub views_dir: PathBuf,
    /// The `.env` file read by [`Settings::load`], if one was found
    #[serde(skip)]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Worker threads; actix picks one per core when unset
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// Connection string, e.g. `sqlite://anonboard.db`
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    pub format: LogFormat,
}

impl Settings {
    /// Loads settings from every layer, reading `.env` first.
    pub fn load() -> Result<Self, ConfigError> {
        let env_file = dotenvy::dotenv().ok();
        let file = std::env::var("ANONBOARD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut settings: Settings = defaults()?
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix("ANONBOARD").prefix_separator("__").separator("__"))
            .set_override_option("database.url", std::env::var("DB_URI").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()?;
        settings.env_file = env_file;
        Ok(settings)
    }
}

/// The bottom layer: enough to run locally with no configuration at all.
pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "sqlite://anonboard.db")?
        .set_default("database.max_connections", 5)?
        .set_default("log.format", "pretty")?
        .set_default("views_dir", "views")?;
    Ok(builder)
}
