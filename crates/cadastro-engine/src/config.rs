//! Runtime configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `cadastro.toml` in the working directory, then `CADASTRO_*` variables
//! (a `.env` file is loaded into the environment first).

use std::path::PathBuf;
use std::time::Duration;

use cadastro_core::logging_facility::Profile;
use serde::Deserialize;

pub const DEFAULT_DATABASE_DIR: &str = ".cadastro";
pub const DEFAULT_DATABASE_NAME: &str = "FuncionariosDB";
pub const DEFAULT_FEEDBACK_HIDE_MS: u64 = 3000;

const DATABASE_EXTENSION: &str = "sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CadastroConfig {
    pub database_dir: PathBuf,
    pub database_name: String,
    pub feedback_hide_ms: u64,
    pub log_profile: String,
}

impl Default for CadastroConfig {
    fn default() -> Self {
        Self {
            database_dir: PathBuf::from(DEFAULT_DATABASE_DIR),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            feedback_hide_ms: DEFAULT_FEEDBACK_HIDE_MS,
            log_profile: "development".to_string(),
        }
    }
}

impl CadastroConfig {
    /// Load configuration from `cadastro.toml` and the environment
    ///
    /// # Errors
    ///
    /// Returns the `config` error when a source is malformed or a value has
    /// the wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_sources(
            config::File::with_name("cadastro").required(false),
            config::Environment::with_prefix("CADASTRO"),
        )
    }

    /// Load configuration from an explicit file and environment source
    ///
    /// # Errors
    ///
    /// Returns the `config` error when a source is malformed or a value has
    /// the wrong type.
    pub fn from_sources<F, E>(file: F, env: E) -> Result<Self, config::ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
        E: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .set_default("database_dir", DEFAULT_DATABASE_DIR)?
            .set_default("database_name", DEFAULT_DATABASE_NAME)?
            .set_default("feedback_hide_ms", DEFAULT_FEEDBACK_HIDE_MS)?
            .set_default("log_profile", "development")?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// Full path of the database file
    pub fn database_path(&self) -> PathBuf {
        self.database_dir
            .join(&self.database_name)
            .with_extension(DATABASE_EXTENSION)
    }

    pub fn feedback_hide_after(&self) -> Duration {
        Duration::from_millis(self.feedback_hide_ms)
    }

    /// Logging profile; unknown names fall back to development
    pub fn profile(&self) -> Profile {
        self.log_profile.parse().unwrap_or(Profile::Development)
    }
}
