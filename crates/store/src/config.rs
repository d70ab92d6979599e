use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default cache location, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".recruit/cache";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One JSON document per store under `dir`
    #[default]
    File,
    /// Process-local, lost on exit
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::default()
        }
    }

    /// Builder: file backend rooted at `dir`
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self.backend = StoreBackend::File;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.backend == StoreBackend::File && self.dir.as_os_str().is_empty() {
            return Err("cache dir must not be empty for the file backend".to_string());
        }
        Ok(())
    }
}
