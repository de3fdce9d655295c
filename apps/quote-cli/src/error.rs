//! # CLI Error Types
//!
//! Everything a command can fail with, printed once by `main`.

use thiserror::Error;
use wyshkit_core::{CoreError, ValidationError};
use wyshkit_db::DbError;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// `validate` found problems; they have already been printed.
    #[error("{0} validation issue(s) found")]
    ValidationFailed(usize),
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Core(CoreError::Validation(err))
    }
}

pub type CliResult<T> = Result<T, CliError>;
