use crate::config::{StoreBackend, StoreConfig};
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs;

/// Named JSON documents, on disk or in memory.
#[derive(Debug)]
pub(crate) enum DocumentStore {
    File { dir: PathBuf },
    Memory(Mutex<HashMap<String, serde_json::Value>>),
}

impl DocumentStore {
    pub(crate) fn new(config: &StoreConfig) -> Self {
        match config.backend {
            StoreBackend::File => Self::File {
                dir: config.dir.clone(),
            },
            StoreBackend::Memory => Self::Memory(Mutex::new(HashMap::new())),
        }
    }

    /// Read a document. Missing or corrupted documents read as `None`.
    pub(crate) async fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self {
            Self::Memory(docs) => {
                let value = lock(docs).get(name).cloned();
                Ok(value.and_then(|v| serde_json::from_value(v).ok()))
            }
            Self::File { dir } => {
                let path = dir.join(format!("{name}.json"));
                let bytes = match fs::read(&path).await {
                    Ok(bytes) => bytes,
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                    Err(err) => return Err(err.into()),
                };
                match serde_json::from_slice(&bytes) {
                    Ok(doc) => Ok(Some(doc)),
                    Err(err) => {
                        log::warn!("Cache document corrupted {}: {err}", path.display());
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Replace a document; file writes go through a temporary file and rename.
    pub(crate) async fn write<T: Serialize>(&self, name: &str, doc: &T) -> Result<()> {
        match self {
            Self::Memory(docs) => {
                let value = serde_json::to_value(doc)?;
                lock(docs).insert(name.to_string(), value);
                Ok(())
            }
            Self::File { dir } => {
                fs::create_dir_all(dir).await?;
                let path = dir.join(format!("{name}.json"));
                let tmp = dir.join(format!("{name}.json.tmp"));
                let bytes = serde_json::to_vec_pretty(doc)?;
                fs::write(&tmp, &bytes).await?;
                if let Err(err) = fs::rename(&tmp, &path).await {
                    let _ = fs::remove_file(&tmp).await;
                    return Err(err.into());
                }
                log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
                Ok(())
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn corrupted_file_reads_as_none() {
        let temp = TempDir::new().unwrap();
        tokio::fs::write(temp.path().join("tags.json"), b"{not json")
            .await
            .unwrap();
        let store = DocumentStore::new(&StoreConfig::default().with_dir(temp.path()));
        let doc: Option<Vec<u32>> = store.read("tags").await.unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn write_leaves_no_temporary_file() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(&StoreConfig::default().with_dir(temp.path().join("nested")));
        store.write("meta", &vec![1, 2, 3]).await.unwrap();

        let doc: Option<Vec<u32>> = store.read("meta").await.unwrap();
        assert_eq!(doc, Some(vec![1, 2, 3]));
        assert!(!temp.path().join("nested/meta.json.tmp").exists());
    }

    #[tokio::test]
    async fn memory_backend_round_trips() {
        let store = DocumentStore::new(&StoreConfig::memory());
        assert!(store.read::<Vec<u32>>("x").await.unwrap().is_none());
        store.write("x", &vec![7]).await.unwrap();
        assert_eq!(store.read::<Vec<u32>>("x").await.unwrap(), Some(vec![7]));
    }
}
