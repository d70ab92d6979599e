use crate::classifier::{category_of, classify, ClassifiedTags};
use recruit_model::{Category, FilterKey, Tag, TagId};
use std::collections::HashMap;

/// Loaded tag catalog with id lookup.
#[derive(Debug, Clone, Default)]
pub struct TagCatalog {
    tags: Vec<Tag>,
    index: HashMap<TagId, usize>,
}

impl TagCatalog {
    /// Later duplicates of an id replace earlier ones in place.
    pub fn new(tags: Vec<Tag>) -> Self {
        let mut catalog = Self::default();
        for tag in tags {
            match catalog.index.get(&tag.id) {
                Some(&pos) => catalog.tags[pos] = tag,
                None => {
                    catalog.index.insert(tag.id, catalog.tags.len());
                    catalog.tags.push(tag);
                }
            }
        }
        catalog
    }

    pub fn get(&self, id: TagId) -> Option<&Tag> {
        self.index.get(&id).map(|&pos| &self.tags[pos])
    }

    /// Localized name, or the id when the tag is unknown.
    pub fn name(&self, id: TagId, locale: &str) -> String {
        self.get(id)
            .map_or_else(|| id.to_string(), |t| t.display_name(locale).into_owned())
    }

    /// Filter key a tag is selected under; `None` for reserved or unknown ids.
    pub fn filter_key(&self, id: TagId) -> Option<FilterKey> {
        self.get(id)?;
        category_of(id).map(Category::filter_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn classify(&self, locale: &str) -> ClassifiedTags {
        classify(&self.tags, locale)
    }
}
