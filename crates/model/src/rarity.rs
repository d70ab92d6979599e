use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const TIER_PREFIX: &str = "TIER_";

/// Normalized rarity tier (1 = lowest, 6 = highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRarity", into = "u8")]
pub struct Rarity(u8);

impl Rarity {
    pub const LOWEST: Rarity = Rarity(1);
    pub const HIGHEST: Rarity = Rarity(6);

    pub fn new(value: u8) -> Result<Self> {
        if (Self::LOWEST.0..=Self::HIGHEST.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ModelError::invalid_rarity(value.to_string()))
        }
    }

    /// Parse either a plain number (`"5"`) or the encoded form (`"TIER_5"`).
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix(TIER_PREFIX).unwrap_or(trimmed);
        let value: u8 = digits
            .parse()
            .map_err(|_| ModelError::invalid_rarity(raw))?;
        Self::new(value).map_err(|_| ModelError::invalid_rarity(raw))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_highest(self) -> bool {
        self.0 == Self::HIGHEST.0
    }

    #[must_use]
    pub const fn is_lowest(self) -> bool {
        self.0 == Self::LOWEST.0
    }

    /// Tiers 2 and 3 are the "common" pulls most players want to hide.
    #[must_use]
    pub const fn is_common(self) -> bool {
        matches!(self.0, 2 | 3)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Rarity> for u8 {
    fn from(value: Rarity) -> Self {
        value.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRarity {
    Number(i64),
    Text(String),
}

impl TryFrom<RawRarity> for Rarity {
    type Error = ModelError;

    fn try_from(raw: RawRarity) -> Result<Self> {
        match raw {
            RawRarity::Number(n) => u8::try_from(n)
                .map_err(|_| ModelError::invalid_rarity(n.to_string()))
                .and_then(Self::new),
            RawRarity::Text(s) => Self::parse(&s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_encoded_forms() {
        assert_eq!(Rarity::parse("TIER_6").unwrap().get(), 6);
        assert_eq!(Rarity::parse("4").unwrap().get(), 4);
        assert_eq!(Rarity::parse(" TIER_1 ").unwrap(), Rarity::LOWEST);
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert!(Rarity::parse("TIER_7").is_err());
        assert!(Rarity::parse("TIER_").is_err());
        assert!(Rarity::parse("legendary").is_err());
        assert!(Rarity::new(0).is_err());
    }

    #[test]
    fn deserializes_number_or_string() {
        let a: Rarity = serde_json::from_str("5").unwrap();
        let b: Rarity = serde_json::from_str("\"TIER_5\"").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<Rarity>("-1").is_err());
        assert_eq!(serde_json::to_string(&a).unwrap(), "5");
    }

    #[test]
    fn tier_predicates() {
        assert!(Rarity::HIGHEST.is_highest());
        assert!(Rarity::LOWEST.is_lowest());
        assert!(Rarity::new(2).unwrap().is_common());
        assert!(Rarity::new(3).unwrap().is_common());
        assert!(!Rarity::new(4).unwrap().is_common());
    }
}
