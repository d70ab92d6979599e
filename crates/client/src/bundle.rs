use crate::error::Result;
use crate::source::RecruitmentSource;
use async_trait::async_trait;
use recruit_engine::{filter_operators, Criterion, FilterSpec};
use recruit_model::{FilterKey, Operator, Tag, TagId};
use recruit_protocol::{MatchMode, RecruitmentBundle};
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;

/// Offline source backed by a recruitment bundle file.
#[derive(Debug)]
pub struct BundleSource {
    path: PathBuf,
    bundle: OnceCell<RecruitmentBundle>,
}

impl BundleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bundle: OnceCell::new(),
        }
    }

    /// Source over an already parsed bundle.
    pub fn from_bundle(bundle: RecruitmentBundle) -> Self {
        Self {
            path: PathBuf::new(),
            bundle: OnceCell::new_with(Some(bundle)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<&RecruitmentBundle> {
        self.bundle
            .get_or_try_init(|| async {
                let bytes = tokio::fs::read(&self.path).await?;
                let bundle: RecruitmentBundle = serde_json::from_slice(&bytes)?;
                log::info!(
                    "Loaded bundle {} ({} tags, {} operators)",
                    self.path.display(),
                    bundle.tags.data.len(),
                    bundle.recruitment_list.data.len()
                );
                Ok(bundle)
            })
            .await
    }
}

#[async_trait]
impl RecruitmentSource for BundleSource {
    async fn fetch_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.load().await?.tags.data.clone())
    }

    async fn fetch_operators(&self, tag_ids: &[TagId], mode: MatchMode) -> Result<Vec<Operator>> {
        let operators = &self.load().await?.recruitment_list.data;
        if tag_ids.is_empty() {
            return Ok(operators.clone());
        }
        let criterion = Criterion::many(tag_ids.iter().copied());
        let spec = match mode {
            MatchMode::All => FilterSpec::new().all(FilterKey::TagList, criterion),
            MatchMode::Any => FilterSpec::new().any(FilterKey::TagList, criterion),
        };
        Ok(filter_operators(operators, &spec).into_iter().cloned().collect())
    }

    async fn fetch_bundle(&self) -> Result<RecruitmentBundle> {
        Ok(self.load().await?.clone())
    }

    fn describe(&self) -> String {
        format!("bundle {}", self.path.display())
    }
}
