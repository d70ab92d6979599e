use recruit_engine::EngineError;
use recruit_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Server unreachable or the connection dropped
    #[error("Network error. Server offline for the moment, try again later ({0})")]
    Network(String),

    #[error("Request to {url} failed with status {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid API configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status {
                url: err.url().map(ToString::to_string).unwrap_or_default(),
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Self::Network(err.to_string()),
        }
    }
}

impl From<ClientError> for EngineError {
    fn from(err: ClientError) -> Self {
        Self::fetch(err.to_string())
    }
}
