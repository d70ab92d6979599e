use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while normalizing source data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Rarity value outside the known tiers or in an unknown encoding
    #[error("Invalid rarity: {0}")]
    InvalidRarity(String),

    /// Unknown filter key name
    #[error("Unknown filter key: {0}")]
    UnknownFilterKey(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl ModelError {
    /// Create an invalid rarity error
    pub fn invalid_rarity(raw: impl Into<String>) -> Self {
        Self::InvalidRarity(raw.into())
    }
}
