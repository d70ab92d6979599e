use crate::backend::DocumentStore;
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use recruit_model::{Operator, Tag, TagId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const META_DOC: &str = "meta";
const PREFERENCES_DOC: &str = "preferences";

/// Record stores kept in the local cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreName {
    Tags,
    Operators,
}

impl StoreName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Operators => "operators",
        }
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that lives in one of the stores, keyed by its id.
pub trait Record: Serialize + DeserializeOwned + Clone {
    type Id: Ord + Clone;

    const STORE: StoreName;

    fn record_id(&self) -> Self::Id;
}

impl Record for Tag {
    type Id = TagId;
    const STORE: StoreName = StoreName::Tags;

    fn record_id(&self) -> TagId {
        self.id
    }
}

impl Record for Operator {
    type Id = String;
    const STORE: StoreName = StoreName::Operators;

    fn record_id(&self) -> String {
        self.id.clone()
    }
}

/// Section visibility toggles persisted between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub hide_rarity_common: bool,
    pub hide_only_rarity_lowest: bool,
}

/// Local cache of tags, operators, per-store timestamps and preferences.
#[derive(Debug)]
pub struct LocalStore {
    docs: DocumentStore,
}

impl LocalStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        config.validate().map_err(StoreError::InvalidConfig)?;
        Ok(Self {
            docs: DocumentStore::new(config),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            docs: DocumentStore::new(&StoreConfig::memory()),
        }
    }

    /// Every record of `R`'s store, ordered by id.
    pub async fn get<R: Record>(&self) -> Result<Vec<R>> {
        Ok(self
            .docs
            .read::<Vec<R>>(R::STORE.as_str())
            .await?
            .unwrap_or_default())
    }

    /// Upsert records by id. Returns the store size afterwards.
    pub async fn put<R: Record>(&self, records: &[R]) -> Result<usize> {
        let mut by_id: BTreeMap<R::Id, R> = self
            .get::<R>()
            .await?
            .into_iter()
            .map(|r| (r.record_id(), r))
            .collect();
        for record in records {
            by_id.insert(record.record_id(), record.clone());
        }
        let merged: Vec<R> = by_id.into_values().collect();
        self.docs.write(R::STORE.as_str(), &merged).await?;
        log::info!(
            "Saved {} {} ({} total)",
            records.len(),
            R::STORE,
            merged.len()
        );
        Ok(merged.len())
    }

    pub async fn updated_at(&self, store: StoreName) -> Result<Option<String>> {
        Ok(self.meta().await?.remove(store.as_str()))
    }

    pub async fn set_updated_at(&self, store: StoreName, updated_at: &str) -> Result<()> {
        let mut meta = self.meta().await?;
        meta.insert(store.as_str().to_string(), updated_at.to_string());
        self.docs.write(META_DOC, &meta).await
    }

    /// Whether `remote` is newer than what was last stored for `store`.
    ///
    /// Timestamps are ISO-8601 strings compared lexicographically. A store
    /// with no timestamp is always outdated; a remote without one never is.
    pub async fn is_outdated(&self, store: StoreName, remote: Option<&str>) -> Result<bool> {
        let stored = self.updated_at(store).await?;
        Ok(match (stored.as_deref(), remote) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(stored), Some(remote)) => remote > stored,
        })
    }

    pub async fn preferences(&self) -> Result<Preferences> {
        Ok(self
            .docs
            .read::<Preferences>(PREFERENCES_DOC)
            .await?
            .unwrap_or_default())
    }

    pub async fn save_preferences(&self, prefs: &Preferences) -> Result<()> {
        self.docs.write(PREFERENCES_DOC, prefs).await
    }

    async fn meta(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.docs.read(META_DOC).await?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recruit_model::Rarity;

    #[tokio::test]
    async fn put_upserts_and_orders_by_id() {
        let store = LocalStore::in_memory();
        store
            .put(&[Tag::new(20, "DPS"), Tag::new(9, "Melee")])
            .await
            .unwrap();
        let total = store
            .put(&[Tag::new(9, "Melee").with_name("zh", "近战位"), Tag::new(11, "Top Operator")])
            .await
            .unwrap();
        assert_eq!(total, 3);

        let tags: Vec<Tag> = store.get().await.unwrap();
        let ids: Vec<_> = tags.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![9, 11, 20]);
        assert_eq!(tags[0].display_name("zh"), "近战位");
    }

    #[tokio::test]
    async fn stores_are_independent() {
        let store = LocalStore::in_memory();
        store
            .put(&[Operator::new("a", "A", Rarity::new(3).unwrap(), "GUARD")])
            .await
            .unwrap();
        assert!(store.get::<Tag>().await.unwrap().is_empty());
        assert_eq!(store.get::<Operator>().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn staleness_compares_iso_strings() {
        let store = LocalStore::in_memory();
        assert!(store.is_outdated(StoreName::Tags, None).await.unwrap());

        store
            .set_updated_at(StoreName::Tags, "2025-03-01T00:00:00Z")
            .await
            .unwrap();
        let older = Some("2025-02-28T23:59:59Z");
        let newer = Some("2025-03-01T00:00:01Z");
        assert!(!store.is_outdated(StoreName::Tags, older).await.unwrap());
        assert!(store.is_outdated(StoreName::Tags, newer).await.unwrap());
        assert!(!store.is_outdated(StoreName::Tags, None).await.unwrap());
        assert!(store.is_outdated(StoreName::Operators, older).await.unwrap());
    }

    #[tokio::test]
    async fn preferences_default_to_visible() {
        let store = LocalStore::in_memory();
        assert_eq!(store.preferences().await.unwrap(), Preferences::default());

        let prefs = Preferences {
            hide_rarity_common: true,
            hide_only_rarity_lowest: false,
        };
        store.save_preferences(&prefs).await.unwrap();
        assert_eq!(store.preferences().await.unwrap(), prefs);
    }
}
