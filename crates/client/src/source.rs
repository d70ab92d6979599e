use crate::error::Result;
use async_trait::async_trait;
use recruit_engine::{EngineError, OperatorFetcher};
use recruit_model::{Operator, Tag, TagId};
use recruit_protocol::{MatchMode, RecruitmentBundle};

/// Where tag and operator data comes from.
#[async_trait]
pub trait RecruitmentSource: Send + Sync {
    /// The tag catalog
    async fn fetch_tags(&self) -> Result<Vec<Tag>>;

    /// Operators carrying all (or any) of `tag_ids`; every operator when empty
    async fn fetch_operators(&self, tag_ids: &[TagId], mode: MatchMode) -> Result<Vec<Operator>>;

    /// Full snapshot with publication timestamps
    async fn fetch_bundle(&self) -> Result<RecruitmentBundle>;

    /// Human-readable origin for logs
    fn describe(&self) -> String;
}

// Sessions fetch in union mode so every operator of a newly selected tag
// lands in the cache at once.
#[async_trait]
impl<'s> OperatorFetcher for dyn RecruitmentSource + 's {
    async fn fetch_operators(&self, tag_ids: &[TagId]) -> recruit_engine::Result<Vec<Operator>> {
        RecruitmentSource::fetch_operators(self, tag_ids, MatchMode::Any)
            .await
            .map_err(EngineError::from)
    }
}
