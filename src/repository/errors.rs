//! Repository-level error types.
//!
//! These errors describe failures of the backing store. They carry no
//! protocol meaning and are never rendered as `<error>` elements.

use std::fmt;

/// Errors that can occur inside a record or format repository.
#[derive(Debug)]
pub enum RepositoryError {
    /// The backing store is temporarily unavailable.
    Unavailable {
        message: String,
        retry_after: Option<std::time::Duration>,
    },

    /// A stored record could not be read back.
    DataCorruption {
        identifier: Option<String>,
        details: String,
    },

    /// Generic internal repository error.
    Internal {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Unavailable {
                message,
                retry_after,
            } => {
                if let Some(duration) = retry_after {
                    write!(
                        f,
                        "Repository unavailable: {} (retry after {:?})",
                        message, duration
                    )
                } else {
                    write!(f, "Repository unavailable: {}", message)
                }
            }
            RepositoryError::DataCorruption {
                identifier,
                details,
            } => {
                if let Some(identifier) = identifier {
                    write!(f, "Data corruption in {}: {}", identifier, details)
                } else {
                    write!(f, "Data corruption: {}", details)
                }
            }
            RepositoryError::Internal { message, .. } => {
                write!(f, "Internal repository error: {}", message)
            }
        }
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepositoryError::Internal {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl RepositoryError {
    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            retry_after: None,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Whether retrying the call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::Unavailable { .. })
    }
}
