use std::process::ExitStatus;

use crate::gateway::ProviderError;

pub type BulkResult<T> = Result<T, BulkError>;

#[derive(Debug, thiserror::Error)]
pub enum BulkError {
    #[error("command failed ({status}): {command}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("environment variable missing: {0}")]
    EnvMissing(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
