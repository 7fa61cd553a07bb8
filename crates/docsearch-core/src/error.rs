use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to extract text from {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    #[error("No document index has been built yet")]
    IndexUnavailable,

    #[error("Retrieval failed: {0}")]
    Retriever(String),

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),
}

pub type Result<T> = std::result::Result<T, Error>;
