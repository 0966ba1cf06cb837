/// Server configuration
use crate::error::{Result, ServerError};
use roster_storage::{pool::DEFAULT_CONNECTION_LIMIT, PoolSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub conn_limits: bool,

    #[serde(default = "default_connection_limit")]
    pub max_open_connections: u32,

    #[serde(default)]
    pub idle_limits: bool,

    #[serde(default = "default_connection_limit")]
    pub max_idle_connections: u32,

    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

/// Values given on the command line; `None` / `false` leave the loaded value alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub port: Option<u16>,
    pub conn_limits: bool,
    pub idle_limits: bool,
    pub max_open_connections: Option<u32>,
    pub max_idle_connections: Option<u32>,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// Sources, lowest precedence first: built-in defaults, the config file
    /// (`path`, or `roster.toml` if present), then `ROSTER_`-prefixed
    /// environment variables with `__` between sections, e.g.
    /// `ROSTER_DATABASE__URL` or `ROSTER_SERVER__PORT`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ROSTER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.database_url {
            self.database.url = url;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if overrides.conn_limits {
            self.database.conn_limits = true;
        }
        if overrides.idle_limits {
            self.database.idle_limits = true;
        }
        if let Some(max_open) = overrides.max_open_connections {
            self.database.max_open_connections = max_open;
        }
        if let Some(max_idle) = overrides.max_idle_connections {
            self.database.max_idle_connections = max_idle;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(ServerError::Config(
                "Database URL is required (pass --dsn or set ROSTER_DATABASE__URL)".to_string(),
            ));
        }

        if self.database.conn_limits && self.database.max_open_connections == 0 {
            return Err(ServerError::Config(
                "max_open_connections must be at least 1".to_string(),
            ));
        }

        if self.database.idle_limits && self.database.max_idle_connections == 0 {
            return Err(ServerError::Config(
                "max_idle_connections must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Pool settings for the connection manager
    pub fn pool_settings(&self) -> PoolSettings {
        let db = &self.database;
        let mut settings = PoolSettings::new(db.url.clone())
            .with_acquire_timeout(Duration::from_secs(db.acquire_timeout_secs));

        if db.conn_limits {
            settings = settings.with_conn_limit(db.max_open_connections);
        }
        if db.idle_limits {
            settings = settings.with_idle_limit(db.max_idle_connections);
        }

        settings
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_connection_limit() -> u32 {
    DEFAULT_CONNECTION_LIMIT
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            conn_limits: false,
            max_open_connections: default_connection_limit(),
            idle_limits: false,
            max_idle_connections: default_connection_limit(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}
