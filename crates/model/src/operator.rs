use crate::rarity::Rarity;
use crate::tag::{TagId, DEFAULT_LOCALE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag reference carried by an operator: numeric catalog ids from the API,
/// or plain labels from hand-written data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagRef {
    Id(TagId),
    Name(String),
}

impl From<TagId> for TagRef {
    fn from(id: TagId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for TagRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// A recruitable operator, normalized at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOperator")]
pub struct Operator {
    pub id: String,

    /// Display name (appellation)
    pub name: String,

    /// Localized names keyed by locale
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub names: BTreeMap<String, String>,

    pub rarity: Rarity,

    pub profession: String,

    #[serde(rename = "subProfessionId")]
    pub sub_profession_id: String,

    /// Tag ids or labels
    #[serde(rename = "tagList")]
    pub tags: Vec<TagRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// False when the source marks the operator as unavailable for recruitment
    pub recruitable: bool,
}

impl Operator {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rarity: Rarity,
        profession: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            names: BTreeMap::new(),
            rarity,
            profession: profession.into(),
            sub_profession_id: String::new(),
            tags: Vec::new(),
            position: None,
            recruitable: true,
        }
    }

    /// Builder: append tag references
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TagRef>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Builder: set position
    #[must_use]
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Builder: set sub-profession
    #[must_use]
    pub fn with_sub_profession(mut self, sub: impl Into<String>) -> Self {
        self.sub_profession_id = sub.into();
        self
    }

    /// Builder: set recruitment availability
    #[must_use]
    pub const fn recruitable(mut self, recruitable: bool) -> Self {
        self.recruitable = recruitable;
        self
    }

    #[must_use]
    pub fn has_tag(&self, tag: &TagRef) -> bool {
        self.tags.contains(tag)
    }

    /// Name for `locale`, falling back to the appellation.
    #[must_use]
    pub fn display_name(&self, locale: &str) -> &str {
        self.names
            .get(locale)
            .or_else(|| self.names.get(DEFAULT_LOCALE))
            .map_or(self.name.as_str(), String::as_str)
    }
}

fn marker_present() -> serde_json::Value {
    serde_json::Value::Bool(true)
}

#[derive(Deserialize)]
struct RawOperator {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    appellation: Option<String>,
    #[serde(default)]
    names: BTreeMap<String, String>,
    #[serde(default)]
    name_en: Option<String>,
    #[serde(default)]
    name_zh: Option<String>,
    #[serde(default, alias = "name_jp")]
    name_ja: Option<String>,
    rarity: Rarity,
    #[serde(default)]
    profession: String,
    #[serde(default, rename = "subProfessionId", alias = "sub_profession_id", alias = "subProfession")]
    sub_profession_id: String,
    #[serde(default, rename = "tagList", alias = "tags")]
    tags: Vec<TagRef>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    recruitable: Option<bool>,
    // absent means available; an explicit null means not recruitable
    #[serde(default = "marker_present")]
    recruitment: serde_json::Value,
}

impl From<RawOperator> for Operator {
    fn from(raw: RawOperator) -> Self {
        let mut names = raw.names;
        for (locale, name) in [("en", raw.name_en), ("zh", raw.name_zh), ("ja", raw.name_ja)] {
            if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
                names.entry(locale.to_string()).or_insert(name);
            }
        }
        let name = raw
            .name
            .or(raw.appellation)
            .or_else(|| names.get(DEFAULT_LOCALE).cloned())
            .unwrap_or_else(|| raw.id.clone());
        let recruitable = raw.recruitable.unwrap_or(!raw.recruitment.is_null());
        Self {
            id: raw.id,
            name,
            names,
            rarity: raw.rarity,
            profession: raw.profession,
            sub_profession_id: raw.sub_profession_id,
            tags: raw.tags,
            position: raw.position.filter(|p| !p.is_empty()),
            recruitable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn api_row_normalizes() {
        let op: Operator = serde_json::from_str(
            r#"{"id":"char_285_medic2","appellation":"Lancet-2","name_en":"Lancet-2",
                "rarity":"TIER_1","profession":"MEDIC","subProfessionId":"physician",
                "IsRecruitOnly":0,"tags":[28,4]}"#,
        )
        .unwrap();
        assert_eq!(op.rarity, Rarity::LOWEST);
        assert_eq!(op.tags, vec![TagRef::Id(28), TagRef::Id(4)]);
        assert!(op.recruitable);
        assert_eq!(op.display_name("zh"), "Lancet-2");
    }

    #[test]
    fn null_recruitment_marker_disables_recruitment() {
        let op: Operator = serde_json::from_str(
            r#"{"id":"x","name":"X","rarity":5,"profession":"SNIPER","recruitment":null}"#,
        )
        .unwrap();
        assert!(!op.recruitable);
    }

    #[test]
    fn string_tag_list_is_supported() {
        let op: Operator = serde_json::from_str(
            r#"{"id":"x","name":"X","rarity":3,"profession":"Vanguard","tagList":["DPS","Melee"],"position":"MELEE"}"#,
        )
        .unwrap();
        assert!(op.has_tag(&TagRef::from("Melee")));
        assert_eq!(op.position.as_deref(), Some("MELEE"));
    }

    #[test]
    fn serialized_operator_reloads_identically() {
        let op = Operator::new("char_1", "Texas", Rarity::new(5).unwrap(), "PIONEER")
            .with_tags([9u32, 1, 20])
            .with_position("MELEE")
            .with_sub_profession("charger");
        let json = serde_json::to_string(&op).unwrap();
        let back: Operator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
    }
}
