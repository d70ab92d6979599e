use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

pub type TagId = u32;

/// Locale used when the active locale has no translation.
pub const DEFAULT_LOCALE: &str = "en";

/// A recruitment tag as loaded from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTag")]
pub struct Tag {
    pub id: TagId,

    /// Localized display names keyed by locale (`en`, `zh`, `ja`)
    pub names: BTreeMap<String, String>,

    /// Catalog ordering hint
    #[serde(rename = "orderNum")]
    pub order_num: i64,
}

impl Tag {
    pub fn new(id: TagId, name_en: impl Into<String>) -> Self {
        let mut names = BTreeMap::new();
        names.insert(DEFAULT_LOCALE.to_string(), name_en.into());
        Self {
            id,
            names,
            order_num: i64::from(id),
        }
    }

    /// Builder: add a localized name
    #[must_use]
    pub fn with_name(mut self, locale: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(locale.into(), name.into());
        self
    }

    /// Builder: set the ordering hint
    #[must_use]
    pub const fn with_order(mut self, order_num: i64) -> Self {
        self.order_num = order_num;
        self
    }

    /// Display name for `locale`, falling back to [`DEFAULT_LOCALE`], then to
    /// any translation, then to the numeric id.
    #[must_use]
    pub fn display_name(&self, locale: &str) -> Cow<'_, str> {
        self.names
            .get(locale)
            .or_else(|| self.names.get(DEFAULT_LOCALE))
            .or_else(|| self.names.values().next())
            .map_or_else(|| Cow::Owned(self.id.to_string()), |s| Cow::Borrowed(s.as_str()))
    }
}

#[derive(Deserialize)]
struct RawTag {
    #[serde(alias = "tagId")]
    id: TagId,
    #[serde(default)]
    names: BTreeMap<String, String>,
    #[serde(default, rename = "orderNum", alias = "order_num")]
    order_num: Option<i64>,
    #[serde(default)]
    name_en: Option<String>,
    #[serde(default)]
    name_zh: Option<String>,
    #[serde(default, alias = "name_ja")]
    name_jp: Option<String>,
    #[serde(default, alias = "tagName")]
    tag_name: Option<String>,
}

impl From<RawTag> for Tag {
    fn from(raw: RawTag) -> Self {
        let mut names = raw.names;
        let flat = [
            ("en", raw.name_en.or(raw.tag_name)),
            ("zh", raw.name_zh),
            ("ja", raw.name_jp),
        ];
        for (locale, name) in flat {
            if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
                names.entry(locale.to_string()).or_insert(name);
            }
        }
        Self {
            id: raw.id,
            names,
            order_num: raw.order_num.unwrap_or(i64::from(raw.id)),
        }
    }
}
