use thiserror::Error;

use crate::core::types::FlockId;

#[derive(Error, Debug)]
pub enum FlockError {
    #[error("Flock not found: {0}")]
    FlockNotFound(FlockId),

    #[error("No flock named {0:?}")]
    UnknownFlockName(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Dispatcher is stopped; job rejected")]
    DispatcherStopped,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlockError>;
