use crate::selection::MAX_SELECTED_TAGS;
use recruit_model::{TagId, DEFAULT_LOCALE};
use serde::{Deserialize, Serialize};

/// Tag id whose presence in a combination allows top-tier operators.
pub const TOP_OPERATOR_TAG_ID: TagId = 11;

/// Configuration for tag resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of simultaneously selected tags (hard cap: 5)
    pub max_selected_tags: usize,

    /// Active locale for tag and operator names
    pub locale: String,

    /// Tag that unlocks the highest rarity tier
    pub top_rarity_tag_id: TagId,

    /// Drop operators that are not available through recruitment
    pub require_recruitable: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_selected_tags: MAX_SELECTED_TAGS,
            locale: DEFAULT_LOCALE.to_string(),
            top_rarity_tag_id: TOP_OPERATOR_TAG_ID,
            require_recruitable: true,
        }
    }
}

impl EngineConfig {
    /// Builder: set the active locale
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_selected_tags == 0 {
            return Err("max_selected_tags must be > 0".to_string());
        }

        // subset enumeration uses a bitmask sized for the hard cap
        if self.max_selected_tags > MAX_SELECTED_TAGS {
            return Err(format!(
                "max_selected_tags ({}) cannot exceed {MAX_SELECTED_TAGS}",
                self.max_selected_tags
            ));
        }

        if self.locale.trim().is_empty() {
            return Err("locale must not be empty".to_string());
        }

        Ok(())
    }
}
