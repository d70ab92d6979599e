use recruit_model::TagId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Selection already holds the maximum number of tags
    #[error("Selection is full ({max} tags)")]
    CapacityExceeded { max: usize },

    /// Data boundary unreachable or returned a failure status
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Unknown tag: {0}")]
    UnknownTag(TagId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
