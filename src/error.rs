//! Error types for OAI-PMH provider operations.
//!
//! Two kinds of failure exist and they never mix. Protocol conditions
//! ([`OaiError`]) are data: the dispatcher turns each one into an `<error>`
//! element inside a well-formed response. Faults ([`ProviderError`]) come
//! from the repositories or the XML writer and are returned to the caller as
//! `Err`, since no protocol response can describe them.

use std::fmt;

/// Protocol error conditions defined by OAI-PMH 2.0.
///
/// This is a closed catalog. Each variant renders as exactly one `<error>`
/// element whose `code` attribute is [`OaiError::code`] and whose text is the
/// `Display` output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OaiError {
    /// Verb argument missing, repeated, or not one of the six protocol verbs
    #[error("Value of the verb argument is not a legal OAI-PMH verb, the verb argument is missing, or the verb argument is repeated.")]
    BadVerb,

    /// Illegal, missing, repeated or conflicting arguments.
    ///
    /// The rendered text is fixed; the kind is only reported in logs.
    #[error("The request includes illegal arguments, is missing required arguments, includes a repeated argument, or values for arguments have an illegal syntax.")]
    BadArgument(BadArgumentKind),

    /// Resumption token that is malformed or expired
    #[error("The value of the resumptionToken argument is invalid or expired.")]
    BadResumptionToken,

    /// `from` is not a legal datestamp
    #[error("The value of the from argument is not a legal datestamp.")]
    BadFromArgument,

    /// `until` is not a legal datestamp
    #[error("The value of the until argument is not a legal datestamp.")]
    BadUntilArgument,

    /// Unknown or illegal identifier
    #[error("The value of the identifier argument is unknown or illegal in this repository.")]
    IdDoesNotExist,

    /// Metadata format not supported by the item or the repository
    #[error("The metadata format identified by the value given for the metadataPrefix argument is not supported by the item or by the repository.")]
    CannotDisseminateFormat,

    /// No metadata formats available
    #[error("There are no metadata formats available for the specified item.")]
    NoMetadataFormats,

    /// The query matched nothing
    #[error("The combination of the values of the from, until, set and metadataPrefix arguments results in an empty list.")]
    NoRecordsMatch,

    /// Sets are not supported
    #[error("The repository does not support sets.")]
    NoSetHierarchy,
}

impl OaiError {
    /// The protocol error code rendered in the `code` attribute.
    pub fn code(&self) -> &'static str {
        match self {
            OaiError::BadVerb => "badVerb",
            OaiError::BadArgument(_) => "badArgument",
            OaiError::BadResumptionToken => "badResumptionToken",
            OaiError::BadFromArgument => "badFromArgument",
            OaiError::BadUntilArgument => "badUntilArgument",
            OaiError::IdDoesNotExist => "idDoesNotExist",
            OaiError::CannotDisseminateFormat => "cannotDisseminateFormat",
            OaiError::NoMetadataFormats => "noMetadataFormats",
            OaiError::NoRecordsMatch => "noRecordsMatch",
            OaiError::NoSetHierarchy => "noSetHierarchy",
        }
    }

    /// The refined reason for a `badArgument` error, if this is one
    pub fn bad_argument_kind(&self) -> Option<&BadArgumentKind> {
        match self {
            OaiError::BadArgument(kind) => Some(kind),
            _ => None,
        }
    }

    /// Create a bad argument error for an argument the verb does not accept
    pub fn unexpected_argument(name: &'static str) -> Self {
        Self::BadArgument(BadArgumentKind::Unexpected(name))
    }

    /// Create a bad argument error for a missing required argument
    pub fn missing_argument(name: &'static str) -> Self {
        Self::BadArgument(BadArgumentKind::Missing(name))
    }
}

/// The reason behind a `badArgument` error.
///
/// All kinds share the `badArgument` code; the kind only refines the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadArgumentKind {
    /// An argument the verb does not accept was supplied
    Unexpected(&'static str),
    /// A required argument was not supplied
    Missing(&'static str),
    /// `resumptionToken` was combined with another argument
    ExclusiveResumptionToken,
    /// An argument was supplied more than once
    Repeated(String),
    /// An argument name that is not part of the protocol
    Unknown(String),
    /// `from` is later than `until`
    InvertedDateRange,
    /// `from` and `until` use different granularities
    MixedGranularity,
    /// A datestamp is finer than the repository granularity
    UnsupportedGranularity(&'static str),
}

impl fmt::Display for BadArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadArgumentKind::Unexpected(name) => {
                write!(f, "argument '{}' is not allowed for this verb", name)
            }
            BadArgumentKind::Missing(name) => {
                write!(f, "required argument '{}' is missing", name)
            }
            BadArgumentKind::ExclusiveResumptionToken => {
                write!(f, "resumptionToken is an exclusive argument")
            }
            BadArgumentKind::Repeated(name) => write!(f, "argument '{}' is repeated", name),
            BadArgumentKind::Unknown(name) => write!(f, "argument '{}' is not recognized", name),
            BadArgumentKind::InvertedDateRange => {
                write!(f, "the from argument is later than the until argument")
            }
            BadArgumentKind::MixedGranularity => {
                write!(f, "the from and until arguments have different granularities")
            }
            BadArgumentKind::UnsupportedGranularity(name) => write!(
                f,
                "argument '{}' is finer than the repository granularity",
                name
            ),
        }
    }
}

/// Faults that escape the dispatcher.
///
/// These are not protocol conditions: a storage outage or a writer failure
/// has no `<error>` code, so the caller decides how to surface it.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Errors from a record or metadata format repository
    #[error("Repository error: {0}")]
    Repository(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Failure while serializing the response document
    #[error("Document rendering error: {message}")]
    Rendering { message: String },
}

impl ProviderError {
    /// Wrap a repository error
    pub fn repository<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Repository(Box::new(error))
    }

    /// Create a rendering error
    pub fn rendering(message: impl Into<String>) -> Self {
        Self::Rendering {
            message: message.into(),
        }
    }
}

/// Errors raised while building a data provider from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BuildError {
    /// Create an invalid configuration error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

pub type OaiResult<T> = Result<T, OaiError>;
pub type ProviderResult<T> = Result<T, ProviderError>;
pub type BuildResult<T> = Result<T, BuildError>;
