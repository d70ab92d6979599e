use crate::catalog::TagCatalog;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::operators::OperatorCache;
use crate::reconciler::{reconcile, SectionCache};
use crate::resolver::{plan_requests, SectionResolver};
use crate::section::Section;
use crate::selection::{SelectedTag, Selection, SelectionState, ToggleOutcome};
use async_trait::async_trait;
use recruit_model::{FilterKey, Operator, TagId};
use std::sync::Arc;

/// Data boundary that returns every operator carrying any of the given tags.
#[async_trait]
pub trait OperatorFetcher: Send + Sync {
    async fn fetch_operators(&self, tag_ids: &[TagId]) -> Result<Vec<Operator>>;
}

/// Receives the results of a refresh cycle.
pub trait SessionObserver {
    /// Ordered sections after reconciliation
    fn on_render(&mut self, _sections: &[Arc<Section>]) {}

    /// Tags deselected because their fetch failed
    fn on_rollback(&mut self, _tag_ids: &[TagId]) {}

    /// Transient user-facing message
    fn on_notice(&mut self, _message: &str) {}
}

impl SessionObserver for () {}

/// Tags a refresh cycle still has to fetch, bound to the generation that
/// planned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    generation: u64,
    missing: Vec<SelectedTag>,
}

impl FetchPlan {
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn missing(&self) -> &[SelectedTag] {
        &self.missing
    }

    pub fn tag_ids(&self) -> Vec<TagId> {
        self.missing.iter().map(|t| t.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }
}

/// What a refresh cycle did.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Rendered(Vec<Arc<Section>>),
    RolledBack {
        deselected: Vec<TagId>,
        sections: Vec<Arc<Section>>,
    },
    /// The selection changed while fetching; the result was dropped
    Stale,
}

impl CycleOutcome {
    pub fn sections(&self) -> &[Arc<Section>] {
        match self {
            Self::Rendered(sections) | Self::RolledBack { sections, .. } => sections,
            Self::Stale => &[],
        }
    }

    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

/// One user's recruitment search: catalog, selection, caches and the
/// generation counter that orders refresh cycles.
#[derive(Debug)]
pub struct RecruitSession {
    catalog: TagCatalog,
    config: EngineConfig,
    state: SelectionState,
    sections: SectionCache,
    rendered: Vec<Arc<Section>>,
    generation: u64,
    resolutions: usize,
}

impl RecruitSession {
    pub fn new(catalog: TagCatalog, config: EngineConfig) -> Result<Self> {
        config.validate().map_err(EngineError::invalid_config)?;
        Ok(Self {
            catalog,
            state: SelectionState::new(config.max_selected_tags),
            config,
            sections: SectionCache::new(),
            rendered: Vec::new(),
            generation: 0,
            resolutions: 0,
        })
    }

    pub const fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub const fn selection(&self) -> &Selection {
        &self.state.selection
    }

    pub const fn operators(&self) -> &OperatorCache {
        &self.state.operators
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Sections produced by the last completed cycle.
    pub fn sections(&self) -> &[Arc<Section>] {
        &self.rendered
    }

    /// Total section resolutions performed so far.
    pub const fn resolutions(&self) -> usize {
        self.resolutions
    }

    /// Toggle a tag under an explicit filter key.
    pub fn toggle(&mut self, key: FilterKey, id: TagId) -> ToggleOutcome {
        let outcome = self.state.toggle(key, id);
        if outcome.applied {
            self.generation += 1;
            log::debug!(
                "Toggled tag {id} ({key}) -> selected={} [generation {}]",
                outcome.selected,
                self.generation
            );
        } else {
            log::debug!("Selection full, tag {id} not added");
        }
        outcome
    }

    /// Toggle a catalog tag, deriving its filter key from its category.
    pub fn toggle_tag(&mut self, id: TagId) -> Result<ToggleOutcome> {
        let key = self
            .catalog
            .filter_key(id)
            .ok_or(EngineError::UnknownTag(id))?;
        Ok(self.toggle(key, id))
    }

    /// Deselect everything. Cached sections are evicted on the next cycle.
    pub fn clear_selection(&mut self) -> Vec<TagId> {
        let cleared: Vec<TagId> = self.state.clear().into_iter().map(|t| t.id).collect();
        if !cleared.is_empty() {
            self.generation += 1;
        }
        cleared
    }

    pub fn plan_refresh(&self) -> FetchPlan {
        FetchPlan {
            generation: self.generation,
            missing: self.state.missing(),
        }
    }

    /// Commit the result of fetching `plan`.
    ///
    /// A plan from an older generation is dropped without touching state. On
    /// failure the plan's tags are deselected and the remaining selection is
    /// rendered again.
    pub fn apply_fetch<O>(
        &mut self,
        plan: FetchPlan,
        result: Result<Vec<Operator>>,
        observer: &mut O,
    ) -> CycleOutcome
    where
        O: SessionObserver + ?Sized,
    {
        if plan.generation != self.generation {
            log::debug!(
                "Dropping fetch for generation {} (current {})",
                plan.generation,
                self.generation
            );
            return CycleOutcome::Stale;
        }

        match result {
            Ok(operators) => {
                let fetched = operators.len();
                self.state.operators.merge(operators);
                self.state.mark_fetched(&plan.missing);
                if !plan.is_empty() {
                    log::debug!("Fetched {fetched} operators for tags {:?}", plan.tag_ids());
                }
                let sections = self.recompute();
                observer.on_render(&sections);
                CycleOutcome::Rendered(sections)
            }
            Err(err) => {
                let deselected: Vec<TagId> = plan
                    .missing
                    .iter()
                    .filter(|t| self.state.deselect(t.id))
                    .map(|t| t.id)
                    .collect();
                self.generation += 1;
                log::warn!("Fetch for tags {deselected:?} failed: {err}");

                let sections = self.recompute();
                observer.on_render(&sections);
                observer.on_rollback(&deselected);
                observer.on_notice(&err.to_string());
                CycleOutcome::RolledBack {
                    deselected,
                    sections,
                }
            }
        }
    }

    /// Reconcile sections for the current selection without fetching.
    pub fn recompute(&mut self) -> Vec<Arc<Section>> {
        let ids = self.state.selection.ids();
        let requests = plan_requests(&ids, &self.catalog, &self.config);
        let mut resolver = SectionResolver::new(&self.state.operators, &self.config);
        let sections = reconcile(
            &requests,
            &mut self.sections,
            self.state.operators.revision(),
            &mut resolver,
        );
        self.resolutions += resolver.resolutions();
        self.rendered.clone_from(&sections);
        sections
    }

    /// Fetch whatever the selection is missing, then apply it.
    pub async fn refresh<F, O>(&mut self, fetcher: &F, observer: &mut O) -> CycleOutcome
    where
        F: OperatorFetcher + ?Sized,
        O: SessionObserver + ?Sized,
    {
        let plan = self.plan_refresh();
        let result = if plan.is_empty() {
            Ok(Vec::new())
        } else {
            fetcher.fetch_operators(&plan.tag_ids()).await
        };
        self.apply_fetch(plan, result, observer)
    }

    /// Toggle a catalog tag and run a refresh cycle.
    ///
    /// A toggle rejected at capacity sends a notice and re-renders the
    /// current sections.
    pub async fn toggle_and_refresh<F, O>(
        &mut self,
        id: TagId,
        fetcher: &F,
        observer: &mut O,
    ) -> Result<CycleOutcome>
    where
        F: OperatorFetcher + ?Sized,
        O: SessionObserver + ?Sized,
    {
        let outcome = self.toggle_tag(id)?;
        if !outcome.applied {
            let err = EngineError::CapacityExceeded {
                max: self.state.selection.capacity(),
            };
            observer.on_notice(&err.to_string());
            let sections = self.rendered.clone();
            observer.on_render(&sections);
            return Ok(CycleOutcome::Rendered(sections));
        }
        Ok(self.refresh(fetcher, observer).await)
    }
}
