use crate::error::Result;
use crate::source::RecruitmentSource;
use recruit_model::Tag;
use recruit_store::{LocalStore, StoreName};

/// How the tag catalog was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOrigin {
    /// Bundle was newer than the cache (or forced) and was stored
    Refreshed,
    /// Cache already held the published data
    UpToDate,
    /// Bundle unavailable; served from the cache
    CachedFallback,
    /// Bundle and cache unavailable; tags fetched directly
    TagsEndpoint,
}

/// Result of [`load_catalog`].
#[derive(Debug, Clone)]
pub struct CatalogSync {
    pub tags: Vec<Tag>,
    pub origin: SyncOrigin,
    pub stored_tags: usize,
    pub stored_operators: usize,
}

/// Bring the local cache up to date with `source` and return the tag catalog.
///
/// The bundle is stored when either dataset is newer than the cached copy or
/// when `force` is set. A failing bundle fetch falls back to the cache, then
/// to the tags endpoint.
pub async fn load_catalog(
    source: &dyn RecruitmentSource,
    store: &LocalStore,
    force: bool,
) -> Result<CatalogSync> {
    let mut stored_tags = 0;
    let mut stored_operators = 0;

    let origin = match source.fetch_bundle().await {
        Ok(bundle) => {
            let tags_stale = store
                .is_outdated(StoreName::Tags, bundle.tags.updated_at.as_deref())
                .await?;
            let ops_stale = store
                .is_outdated(StoreName::Operators, bundle.recruitment_list.updated_at.as_deref())
                .await?;

            if force || tags_stale || ops_stale {
                stored_tags = store.put(&bundle.tags.data).await?;
                stored_operators = store.put(&bundle.recruitment_list.data).await?;
                if let Some(ts) = bundle.tags.updated_at.as_deref() {
                    store.set_updated_at(StoreName::Tags, ts).await?;
                }
                if let Some(ts) = bundle.recruitment_list.updated_at.as_deref() {
                    store.set_updated_at(StoreName::Operators, ts).await?;
                }
                log::info!(
                    "Synced {stored_tags} tags and {stored_operators} operators from {}",
                    source.describe()
                );
                SyncOrigin::Refreshed
            } else {
                log::debug!("Local cache is current with {}", source.describe());
                SyncOrigin::UpToDate
            }
        }
        Err(err) => {
            log::warn!("Bundle fetch from {} failed: {err}", source.describe());
            SyncOrigin::CachedFallback
        }
    };

    let tags: Vec<Tag> = store.get().await?;
    if !tags.is_empty() || origin != SyncOrigin::CachedFallback {
        return Ok(CatalogSync {
            tags,
            origin,
            stored_tags,
            stored_operators,
        });
    }

    let tags = source.fetch_tags().await?;
    let stored_tags = store.put(&tags).await?;
    Ok(CatalogSync {
        tags,
        origin: SyncOrigin::TagsEndpoint,
        stored_tags,
        stored_operators: 0,
    })
}
