use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors raised while building a board layout or painting it
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("invalid board configuration: {0}")]
    InvalidConfig(String),
    #[error("tag ID {id} not found in code table")]
    Lookup { id: u32 },
    #[error("tag ID {id} has a {actual}-bit code, layout expects {expected} bits")]
    ConfigMismatch { id: u32, expected: u32, actual: u32 },
    #[error("surface does not support {0}")]
    Unsupported(&'static str),
    #[error("font error: {0}")]
    Font(String),
    #[error("invalid code table: {0}")]
    CodeTable(String),
    #[error(transparent)]
    Config(#[from] tagboard_common::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
