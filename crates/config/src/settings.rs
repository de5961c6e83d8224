use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub store: StoreSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub backend: StoreBackend,
}

/// Which document store the planner talks to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Mongo,
    /// In-process store, lost on exit.
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("PLANNER"),
            )
            .set_default("store.backend", "mongo")?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "eventplanner")?
            .build()?;

        config.try_deserialize()
    }

    /// Settings for the in-memory backend, independent of files and environment.
    pub fn in_memory() -> Self {
        Self {
            store: StoreSettings {
                backend: StoreBackend::Memory,
            },
            database: DatabaseSettings {
                url: String::new(),
                name: "eventplanner".to_string(),
                max_pool_size: None,
                min_pool_size: None,
            },
        }
    }
}
