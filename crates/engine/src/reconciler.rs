use crate::resolver::{ResolveSection, SectionRequest};
use crate::section::{sort_sections, Section};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Sections materialized in earlier cycles, keyed by section key.
#[derive(Debug, Clone, Default)]
pub struct SectionCache {
    sections: HashMap<String, Arc<Section>>,
    /// Keys that resolved to no operators at `operator_revision`
    empty: HashSet<String>,
    operator_revision: u64,
}

impl SectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Arc<Section>> {
        self.sections.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sections.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn clear(&mut self) {
        self.sections.clear();
        self.empty.clear();
    }
}

/// Bring `cache` in line with `requests` and return the ordered sections.
///
/// Cached keys are reused, keys no longer requested are evicted and only
/// missing keys reach `resolver`. A key that resolved empty is not retried
/// until `operator_revision` changes.
pub fn reconcile<R>(
    requests: &[SectionRequest],
    cache: &mut SectionCache,
    operator_revision: u64,
    resolver: &mut R,
) -> Vec<Arc<Section>>
where
    R: ResolveSection + ?Sized,
{
    if cache.operator_revision != operator_revision {
        cache.empty.clear();
        cache.operator_revision = operator_revision;
    }

    let required: HashSet<&str> = requests.iter().map(|r| r.key.as_str()).collect();
    let before = cache.sections.len();
    cache.sections.retain(|key, _| required.contains(key.as_str()));
    cache.empty.retain(|key| required.contains(key.as_str()));
    let evicted = before - cache.sections.len();

    let mut created = 0;
    let mut out: Vec<Arc<Section>> = Vec::with_capacity(requests.len());
    let mut emitted = HashSet::new();

    for request in requests {
        if !emitted.insert(request.key.as_str()) {
            continue;
        }
        if let Some(section) = cache.sections.get(&request.key) {
            out.push(Arc::clone(section));
            continue;
        }
        if cache.empty.contains(&request.key) {
            continue;
        }
        match resolver.resolve(request) {
            Some(section) => {
                let section = Arc::new(section);
                cache.sections.insert(request.key.clone(), Arc::clone(&section));
                out.push(section);
                created += 1;
            }
            None => {
                cache.empty.insert(request.key.clone());
            }
        }
    }

    sort_sections(&mut out);
    log::debug!(
        "Reconciled {} sections ({created} created, {evicted} evicted)",
        out.len()
    );
    out
}
