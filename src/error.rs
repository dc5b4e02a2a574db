use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event channel error: {0}")]
    Channel(String),
}

pub type Result<T> = std::result::Result<T, NavError>;
