use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::Path;

use crate::error::Error;

pub const DEFAULT_DATABASE_PATH: &str = "plex.sqlite";
pub const DEFAULT_WINDOW_MONTHS: u32 = 18;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Path to the Plex library database. Opened read-only.
    pub database_path: String,
    /// Staleness window in calendar months.
    pub window_months: u32,
    /// Library section audited by `decay` when none is given on the command line.
    #[serde(default)]
    pub section_id: Option<i64>,
    /// Where `decay` writes its CSV export, if anywhere.
    #[serde(default)]
    pub export_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            window_months: DEFAULT_WINDOW_MONTHS,
            section_id: None,
            export_path: None,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.window_months == 0 {
            return Err(Error::InvalidWindow(self.window_months));
        }
        Ok(())
    }
}

fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("database_path", DEFAULT_DATABASE_PATH)?
        .set_default("window_months", DEFAULT_WINDOW_MONTHS as i64)
}

/// Defaults, then an optional `Config.toml` in the working directory, then
/// `PLEX_AUDIT_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, Error> {
    let config = builder_with_defaults()?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("PLEX_AUDIT").try_parsing(true))
        .build()?
        .try_deserialize::<AppConfig>()?;
    config.validate()?;
    Ok(config)
}

/// Defaults overlaid with a single required file. Environment is ignored.
pub fn load_configuration_from(path: &Path) -> Result<AppConfig, Error> {
    let config = builder_with_defaults()?
        .add_source(ConfigFile::from(path).required(true))
        .build()?
        .try_deserialize::<AppConfig>()?;
    config.validate()?;
    Ok(config)
}
