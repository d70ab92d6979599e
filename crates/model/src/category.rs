use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display category of a tag. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Qualification,
    Position,
    Class,
    Specialization,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Qualification,
        Category::Position,
        Category::Class,
        Category::Specialization,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Qualification => "Qualification",
            Self::Position => "Position",
            Self::Class => "Class",
            Self::Specialization => "Specialization",
        }
    }

    /// Semantic operator field a tag of this category filters on.
    #[must_use]
    pub const fn filter_key(self) -> FilterKey {
        match self {
            Self::Qualification => FilterKey::Rarity,
            Self::Position => FilterKey::Position,
            Self::Class => FilterKey::Profession,
            Self::Specialization => FilterKey::TagList,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operator field used by the predicate matcher and as the selection partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterKey {
    #[serde(rename = "rarity")]
    Rarity,
    #[serde(rename = "position")]
    Position,
    #[serde(rename = "profession")]
    Profession,
    #[serde(rename = "subProfessionId")]
    SubProfession,
    #[serde(rename = "tagList")]
    TagList,
}

impl FilterKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rarity => "rarity",
            Self::Position => "position",
            Self::Profession => "profession",
            Self::SubProfession => "subProfessionId",
            Self::TagList => "tagList",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rarity" => Ok(Self::Rarity),
            "position" => Ok(Self::Position),
            "profession" => Ok(Self::Profession),
            "subProfessionId" => Ok(Self::SubProfession),
            "tagList" => Ok(Self::TagList),
            other => Err(ModelError::UnknownFilterKey(other.to_string())),
        }
    }
}
