//! # mt-config
//!
//! Layered settings: built-in defaults, then an optional TOML file
//! (`mistake-tracker.toml` or the path in `MT_CONFIG`), then `MT__*`
//! environment variables (`MT__SERVER__PORT=8080`).

use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "mistake-tracker";
pub const CONFIG_PATH_VAR: &str = "MT_CONFIG";
pub const ENV_PREFIX: &str = "MT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
    /// `.env` file picked up by [`Settings::load`], if any. Reported by the
    /// binary once logging is up.
    #[serde(skip)]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Request body cap in bytes; unset means unbounded
    #[serde(default)]
    pub max_body_bytes: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Backing JSON document for all mistakes
    pub data_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UiSettings {
    /// Directory served under `/static`
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LogSettings {
    /// Used when RUST_LOG is unset
    pub level: String,
    pub json: bool,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Settings {
    /// Loads `.env`, then resolves settings from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let env_file = dotenvy::dotenv().ok();
        let file = std::env::var(CONFIG_PATH_VAR).ok();
        let mut settings = Self::from_sources(file.as_deref(), None)?;
        settings.env_file = env_file;
        Ok(settings)
    }

    /// `env` replaces the process environment when given (used by tests).
    pub fn from_sources(
        file: Option<&str>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("storage.data_file", "data/mistakes.json")?
            .set_default("ui.static_dir", "crates/mt-ui/static")?
            .set_default("log.level", "info")?
            .set_default("log.json", false)?
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
