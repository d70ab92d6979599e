use crate::catalog::TagCatalog;
use crate::combination::enumerate_combinations;
use crate::config::EngineConfig;
use crate::matcher::{matches, Criterion, FilterSpec, FilterValue};
use crate::operators::OperatorCache;
use crate::section::{section_key, Section};
use recruit_model::{FilterKey, Operator, TagId};
use std::collections::HashSet;

/// One section the current selection requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRequest {
    pub key: String,
    pub title: Vec<String>,
    pub tag_ids: Vec<TagId>,
    /// The combination contains the top-rarity tag
    pub allow_highest: bool,
}

impl SectionRequest {
    pub fn new(tag_ids: Vec<TagId>, catalog: &TagCatalog, config: &EngineConfig) -> Self {
        let title: Vec<String> = tag_ids
            .iter()
            .map(|id| catalog.name(*id, &config.locale))
            .collect();
        Self {
            key: section_key(&title),
            allow_highest: tag_ids.contains(&config.top_rarity_tag_id),
            title,
            tag_ids,
        }
    }
}

/// Requests for every selected tag, then every combination of two or more.
///
/// Requests sharing a key collapse into the first one.
pub fn plan_requests(
    selected: &[TagId],
    catalog: &TagCatalog,
    config: &EngineConfig,
) -> Vec<SectionRequest> {
    let singles = selected.iter().map(|id| vec![*id]);
    let combos = enumerate_combinations(selected);

    let mut seen = HashSet::new();
    singles
        .chain(combos)
        .map(|ids| SectionRequest::new(ids, catalog, config))
        .filter(|req| seen.insert(req.key.clone()))
        .collect()
}

/// An operator carries `id` in its position, profession or tag list.
///
/// Rarity is not consulted: it is held as a tier number (1..=6), which would
/// collide with the class tag ids.
pub fn union_predicate(id: TagId) -> FilterSpec {
    let value = FilterValue::from(id);
    [
        FilterKey::Position,
        FilterKey::Profession,
        FilterKey::TagList,
    ]
    .into_iter()
    .fold(FilterSpec::new(), |spec, key| {
        spec.any(key, Criterion::One(value.clone()))
    })
}

/// Computes a section for a request, or `None` when nothing matches.
pub trait ResolveSection {
    fn resolve(&mut self, request: &SectionRequest) -> Option<Section>;
}

/// Resolves requests against the operator cache.
pub struct SectionResolver<'a> {
    operators: &'a OperatorCache,
    locale: &'a str,
    require_recruitable: bool,
    resolutions: usize,
}

impl<'a> SectionResolver<'a> {
    pub fn new(operators: &'a OperatorCache, config: &'a EngineConfig) -> Self {
        Self {
            operators,
            locale: &config.locale,
            require_recruitable: config.require_recruitable,
            resolutions: 0,
        }
    }

    /// How many requests this resolver has evaluated.
    pub const fn resolutions(&self) -> usize {
        self.resolutions
    }

    /// Rarity, then case-folded name. Names compare by code point after
    /// lowercasing; there is no collation table behind the locale.
    fn member_order(&self, a: &Operator, b: &Operator) -> std::cmp::Ordering {
        let name_a = a.display_name(self.locale);
        let name_b = b.display_name(self.locale);
        a.rarity
            .cmp(&b.rarity)
            .then_with(|| name_a.to_lowercase().cmp(&name_b.to_lowercase()))
            .then_with(|| name_a.cmp(name_b))
            .then_with(|| a.id.cmp(&b.id))
    }
}

impl ResolveSection for SectionResolver<'_> {
    fn resolve(&mut self, request: &SectionRequest) -> Option<Section> {
        self.resolutions += 1;

        let predicates: Vec<FilterSpec> = request
            .tag_ids
            .iter()
            .map(|id| {
                let spec = union_predicate(*id);
                if self.require_recruitable {
                    spec.recruitable_only()
                } else {
                    spec
                }
            })
            .collect();

        let mut members: Vec<Operator> = self
            .operators
            .values()
            .filter(|op| predicates.iter().all(|spec| matches(op, spec)))
            .filter(|op| request.allow_highest || !op.rarity.is_highest())
            .cloned()
            .collect();

        if members.is_empty() {
            log::debug!("No operators for {:?}", request.tag_ids);
            return None;
        }

        members.sort_by(|a, b| self.member_order(a, b));
        Some(Section::new(
            request.title.clone(),
            request.tag_ids.clone(),
            members,
        ))
    }
}
