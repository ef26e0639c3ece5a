use std::{env, path::PathBuf};

use machine_learning::app;

use crate::error::{Result, ServerErr};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Where the server listens and which model it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: app::model_path(),
        }
    }
}

impl ServerConfig {
    /// Reads the config from the `HOST`, `PORT` and `MODEL_PATH` environment variables, falling
    /// back to the defaults for the missing ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reading the variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| ServerErr::Config(format!("PORT={raw}: {e}")))?,
            None => default.port,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(default.host),
            port,
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(default.model_path),
        })
    }

    /// Returns the `host:port` address to bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
