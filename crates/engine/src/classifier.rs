use recruit_model::{Category, Tag, TagId};
use std::cmp::Ordering;

/// Gender tags present in the catalog but never offered for selection.
pub const RESERVED_TAG_IDS: [TagId; 2] = [1012, 1013];

/// Fixed category membership, scanned in declaration order.
pub const CATEGORY_TABLE: [(Category, &[TagId]); 3] = [
    (Category::Qualification, &[28, 17, 14, 11]),
    (Category::Position, &[9, 10]),
    (Category::Class, &[8, 1, 3, 2, 6, 4, 5, 7]),
];

/// Category of a tag id; `None` for reserved ids.
#[must_use]
pub fn category_of(id: TagId) -> Option<Category> {
    if RESERVED_TAG_IDS.contains(&id) {
        return None;
    }
    let category = CATEGORY_TABLE
        .iter()
        .find(|(_, ids)| ids.contains(&id))
        .map_or(Category::Specialization, |(category, _)| *category);
    Some(category)
}

/// Tags grouped by category, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTags {
    groups: Vec<(Category, Vec<Tag>)>,
}

impl ClassifiedTags {
    pub fn get(&self, category: Category) -> &[Tag] {
        self.groups
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, tags)| tags.as_slice())
            .unwrap_or(&[])
    }

    /// Every category, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Tag])> {
        self.groups.iter().map(|(c, tags)| (*c, tags.as_slice()))
    }

    /// All tags flattened in display order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.groups.iter().flat_map(|(_, tags)| tags.iter())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, tags)| tags.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `tags` into display categories.
///
/// Fixed categories are ordered by `orderNum` (stable); specializations by
/// localized name, case-insensitively.
pub fn classify<'a, I>(tags: I, locale: &str) -> ClassifiedTags
where
    I: IntoIterator<Item = &'a Tag>,
{
    let mut groups: Vec<(Category, Vec<Tag>)> =
        Category::ALL.iter().map(|c| (*c, Vec::new())).collect();

    for tag in tags {
        let Some(category) = category_of(tag.id) else {
            continue;
        };
        if let Some((_, bucket)) = groups.iter_mut().find(|(c, _)| *c == category) {
            bucket.push(tag.clone());
        }
    }

    for (category, bucket) in &mut groups {
        match category {
            Category::Specialization => bucket.sort_by(|a, b| by_localized_name(a, b, locale)),
            _ => bucket.sort_by_key(|t| t.order_num),
        }
    }

    ClassifiedTags { groups }
}

/// Lowercased code point order of the localized names, then id.
fn by_localized_name(a: &Tag, b: &Tag, locale: &str) -> Ordering {
    let name_a = a.display_name(locale).to_lowercase();
    let name_b = b.display_name(locale).to_lowercase();
    name_a.cmp(&name_b).then(a.id.cmp(&b.id))
}
