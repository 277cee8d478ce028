//! Error types for cidrcap.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CidrcapError {
    #[error("Malformed CIDR: {0}")]
    MalformedInput(String),

    #[error("Invalid target block count {0}: must be at least 1")]
    InvalidTarget(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, CidrcapError>;
