use crate::error::BulkResult;
use crate::gateway::ProviderError;

/// Why one unit of work failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    #[error("zone already exists: {0}")]
    ZoneAlreadyExists(ProviderError),

    #[error("zone not found: {0}")]
    ZoneNotFound(String),

    #[error("existing DNS record not found")]
    RecordNotFound,

    #[error("{0}")]
    Provider(ProviderError),
}

/// Result of one unit of work: a domain, or one record of a
/// multi-record operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure {
        error: OperationError,
        /// Best-effort payload kept for reporting continuity.
        partial: Option<T>,
    },
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn failed(error: OperationError) -> Self {
        Self::Failure {
            error,
            partial: None,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The success payload, or the partial payload of a failure.
    #[must_use]
    pub const fn payload(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure { partial, .. } => partial.as_ref(),
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&OperationError> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

/// Receives outcomes as operations produce them.
///
/// A sink may be called any number of times per domain,
/// including zero. Sinks that number their output keep their
/// own count.
pub trait OutcomeSink<T> {
    fn accept(&mut self, domain: &str, outcome: Outcome<T>) -> BulkResult<()>;
}

impl<T> OutcomeSink<T> for Vec<Outcome<T>> {
    fn accept(&mut self, _domain: &str, outcome: Outcome<T>) -> BulkResult<()> {
        self.push(outcome);
        Ok(())
    }
}
