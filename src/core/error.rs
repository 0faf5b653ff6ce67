use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Being {0} has no active pregnancy")]
    NotPregnant(crate::core::types::BeingId),

    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
