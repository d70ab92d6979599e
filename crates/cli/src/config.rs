use anyhow::{anyhow, Context, Result};
use recruit_client::ApiConfig;
use recruit_engine::EngineConfig;
use recruit_server::ServerConfig;
use recruit_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "recruit.toml";

pub const ENV_API_URL: &str = "RECRUIT_API_URL";
pub const ENV_LOCALE: &str = "RECRUIT_LOCALE";
pub const ENV_CACHE_DIR: &str = "RECRUIT_CACHE_DIR";

/// Layered configuration: file, then environment, then flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub store: StoreConfig,
    pub api: ApiConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Read `path`, or `recruit.toml` if present; defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty(ENV_API_URL) {
            self.api = std::mem::take(&mut self.api).with_base_url(url);
        }
        if let Some(locale) = non_empty(ENV_LOCALE) {
            self.engine.locale = locale;
        }
        if let Some(dir) = non_empty(ENV_CACHE_DIR) {
            self.store = std::mem::take(&mut self.store).with_dir(dir);
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.engine
            .validate()
            .map_err(|e| anyhow!("[engine] {e}"))?;
        self.store.validate().map_err(|e| anyhow!("[store] {e}"))?;
        self.api.validate().map_err(|e| anyhow!("[api] {e}"))?;
        self.server
            .validate()
            .map_err(|e| anyhow!("[server] {e}"))?;
        Ok(())
    }
}
