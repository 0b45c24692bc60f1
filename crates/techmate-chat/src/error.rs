//! Application-level errors. Anything here ends the process with exit code 1.

use techmate_rs::error::{ModelError, SearchError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{env} is not set (export it or pass --api-key)")]
    MissingApiKey { env: &'static str },

    #[error("failed to create API client: {0}")]
    Client(#[source] ModelError),

    #[error("failed to create search client: {0}")]
    Search(#[source] SearchError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
