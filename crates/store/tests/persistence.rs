use pretty_assertions::assert_eq;
use recruit_model::{Operator, Rarity, Tag};
use recruit_store::{LocalStore, Preferences, StoreConfig, StoreName};
use tempfile::TempDir;

fn file_store(temp: &TempDir) -> LocalStore {
    LocalStore::new(&StoreConfig::default().with_dir(temp.path().join("cache"))).expect("store")
}

#[tokio::test]
async fn data_survives_reopening() {
    let temp = TempDir::new().unwrap();
    {
        let store = file_store(&temp);
        store
            .put(&[Tag::new(9, "Melee"), Tag::new(1, "Guard")])
            .await
            .unwrap();
        store
            .put(&[Operator::new("char_1", "Fang", Rarity::new(3).unwrap(), "PIONEER").with_tags([9u32])])
            .await
            .unwrap();
        store
            .set_updated_at(StoreName::Tags, "2025-05-01T12:00:00Z")
            .await
            .unwrap();
        store
            .save_preferences(&Preferences {
                hide_rarity_common: false,
                hide_only_rarity_lowest: true,
            })
            .await
            .unwrap();
    }

    let store = file_store(&temp);
    let tags: Vec<Tag> = store.get().await.unwrap();
    assert_eq!(tags.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 9]);
    let operators: Vec<Operator> = store.get().await.unwrap();
    assert_eq!(operators[0].name, "Fang");
    assert_eq!(
        store.updated_at(StoreName::Tags).await.unwrap().as_deref(),
        Some("2025-05-01T12:00:00Z")
    );
    assert!(store.preferences().await.unwrap().hide_only_rarity_lowest);

    let files: Vec<String> = std::fs::read_dir(temp.path().join("cache"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(files.is_empty(), "leftover temporary files: {files:?}");
}

#[tokio::test]
async fn corrupted_store_is_rebuilt_on_next_put() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("cache");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("tags.json"), "[{\"id\": ").unwrap();
    std::fs::write(dir.join("meta.json"), "garbage").unwrap();

    let store = file_store(&temp);
    assert!(store.get::<Tag>().await.unwrap().is_empty());
    assert!(store.is_outdated(StoreName::Tags, Some("2020-01-01")).await.unwrap());

    store.put(&[Tag::new(20, "DPS")]).await.unwrap();
    assert_eq!(store.get::<Tag>().await.unwrap().len(), 1);
}

#[test]
fn empty_cache_dir_is_rejected() {
    let err = LocalStore::new(&StoreConfig::default().with_dir("")).unwrap_err();
    assert!(err.to_string().contains("cache dir"));
}
