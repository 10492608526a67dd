use std::io;
use thiserror::Error;

/// Every way a commitmentor run can fail.
///
/// Only `Configuration` is fatal; the rest are reported as a single line
/// and the process still exits successfully.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Format(String),

    #[error("{0}")]
    Advisory(String),

    #[error("{0}")]
    Io(#[from] io::Error),
}

impl AdvisorError {
    /// Short label printed in front of the error message.
    pub fn kind(&self) -> &'static str {
        match self {
            AdvisorError::Configuration(_) => "configuration",
            AdvisorError::NotFound(_) => "not found",
            AdvisorError::Format(_) => "format",
            AdvisorError::Advisory(_) => "advisory",
            AdvisorError::Io(_) => "io",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, AdvisorError::Configuration(_))
    }

    /// Wrap an internal error chain as an advisory-service failure.
    pub fn advisory(err: anyhow::Error) -> Self {
        AdvisorError::Advisory(format!("{err:#}"))
    }
}

pub type AdvisorResult<T> = std::result::Result<T, AdvisorError>;
