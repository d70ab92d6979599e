use anyhow::Result;
use recruit_model::{Operator, Tag, TagId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const API_PREFIX: &str = "/api/arknights";
pub const TAGS_PATH: &str = "/api/arknights/recruitment-tags";
pub const FILTER_PATH: &str = "/api/arknights/recruitment-operators";
pub const OPERATORS_PATH: &str = "/api/arknights/operators";
pub const SETUP_PATH: &str = "/api/setup";
pub const HEALTH_PATH: &str = "/health";
pub const BUNDLE_PATH: &str = "/static/arknights/recruitment.json";

/// How a multi-tag operator query combines its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Operator must carry every tag (intersection)
    #[default]
    All,
    /// Operator must carry at least one tag (union)
    Any,
}

impl MatchMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "any" => Ok(Self::Any),
            other => anyhow::bail!("unknown match mode '{other}' (expected all|any)"),
        }
    }
}

/// Error body returned by the data API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Tag row as stored in `recruitment_tags`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TagRow {
    pub id: TagId,
    pub name_zh: Option<String>,
    pub name_en: Option<String>,
    pub name_jp: Option<String>,
}

impl From<&Tag> for TagRow {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name_zh: tag.names.get("zh").cloned(),
            name_en: tag.names.get("en").cloned(),
            name_jp: tag.names.get("ja").cloned(),
        }
    }
}

/// Operator row as stored in `operators`, plus its joined tag ids.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OperatorRow {
    pub id: String,
    #[serde(default)]
    pub appellation: String,
    pub name_zh: Option<String>,
    pub name_ja: Option<String>,
    pub name_en: Option<String>,
    /// Stored as text: `"TIER_n"` or a bare number
    #[serde(deserialize_with = "text_or_number")]
    pub rarity: String,
    #[serde(default)]
    pub profession: String,
    #[serde(rename = "subProfessionId", default)]
    pub sub_profession_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(rename = "IsRecruitOnly", default, deserialize_with = "flag")]
    pub is_recruit_only: bool,
    #[serde(default)]
    pub tags: Vec<TagId>,
}

/// A dataset with its publication timestamp (ISO-8601 string).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DataList<T> {
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub data: Vec<T>,
}

impl<T> DataList<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            updated_at: None,
            data,
        }
    }
}

/// Full recruitment snapshot as the client sees it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RecruitmentBundle {
    pub tags: DataList<Tag>,
    pub recruitment_list: DataList<Operator>,
}

/// Row-level form of the snapshot: the `/api/setup` body and the served
/// bundle file. Deserializes as a [`RecruitmentBundle`] on the client side.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SetupPayload {
    pub tags: DataList<TagRow>,
    pub recruitment_list: DataList<OperatorRow>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub status: String,
    pub tags: usize,
    pub operators: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
}

/// Parse `tag_ids` query values; each value may itself be comma separated.
pub fn parse_tag_ids<'a>(values: impl IntoIterator<Item = &'a str>) -> Result<Vec<TagId>> {
    let mut ids = Vec::new();
    for value in values {
        for part in value.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let id: TagId = part
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid tag id '{part}'"))?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    Ok(ids)
}

/// Query string for the filter endpoint.
#[must_use]
pub fn filter_query(tag_ids: &[TagId], mode: MatchMode) -> String {
    let joined = tag_ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("tag_ids={joined}&match={mode}")
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

// SQLite booleans come back as integers
fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Number(i64),
        Null(()),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Number(n) => n != 0,
        Raw::Null(()) => false,
    })
}
