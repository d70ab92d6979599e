use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_DB_PATH: &str = "recruit.db";

/// Data API server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (`host:port`)
    pub bind: String,

    /// SQLite database file
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.bind
            .parse::<SocketAddr>()
            .map_err(|e| format!("bind must be host:port ({}: {e})", self.bind))?;
        if self.db_path.as_os_str().is_empty() {
            return Err("db_path must not be empty".to_string());
        }
        Ok(())
    }
}
