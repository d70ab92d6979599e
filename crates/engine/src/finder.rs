use crate::classifier::ClassifiedTags;
use recruit_model::TagId;

/// Keyboard-style tag search: case-insensitive name prefix over the
/// classified catalog, with a cursor that cycles through the hits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFinder {
    query: String,
    hits: Vec<TagId>,
    cursor: usize,
}

impl TagFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the query and return the first hit.
    pub fn search(&mut self, query: &str, tags: &ClassifiedTags, locale: &str) -> Option<TagId> {
        self.query = query.trim().to_lowercase();
        self.cursor = 0;
        self.hits = if self.query.is_empty() {
            Vec::new()
        } else {
            tags.tags()
                .filter(|t| t.display_name(locale).to_lowercase().starts_with(&self.query))
                .map(|t| t.id)
                .collect()
        };
        self.active()
    }

    pub fn active(&self) -> Option<TagId> {
        self.hits.get(self.cursor).copied()
    }

    /// Move to the next hit, wrapping around.
    pub fn advance(&mut self) -> Option<TagId> {
        if self.hits.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.hits.len();
        self.active()
    }

    pub fn hits(&self) -> &[TagId] {
        &self.hits
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
