//! Service settings, read from an optional `settings.toml` and then from the
//! environment (`MONGODB_URI`, `PORT`, `CORS_ORIGIN`, ...).
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub mongodb_uri: String,
    pub database: String,
    pub bind: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub log_level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::default().try_parsing(true)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("database", "TripSplit")?
            .set_default("bind", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("log_level", "info")?
            .build()?
            .try_deserialize()
    }
}
