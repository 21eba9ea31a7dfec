//! Handler outcome plumbing.
//!
//! Verb handlers can stop for two unrelated reasons: a protocol condition,
//! which becomes an `<error>` element, or a fault, which escapes the
//! dispatcher. `HandlerError` lets handlers use `?` for both.

use crate::error::{OaiError, ProviderError};
use crate::resumption::TokenError;

#[derive(Debug)]
pub(crate) enum HandlerError {
    Protocol(OaiError),
    Fault(ProviderError),
}

impl From<OaiError> for HandlerError {
    fn from(error: OaiError) -> Self {
        HandlerError::Protocol(error)
    }
}

impl From<TokenError> for HandlerError {
    fn from(error: TokenError) -> Self {
        HandlerError::Protocol(error.into())
    }
}

impl From<ProviderError> for HandlerError {
    fn from(error: ProviderError) -> Self {
        HandlerError::Fault(error)
    }
}

impl HandlerError {
    /// Report any protocol condition as `badResumptionToken`.
    ///
    /// Used for arguments that came out of a decoded token: the harvester
    /// only sent the token, so the token is what is wrong. Faults pass
    /// through unchanged.
    pub(crate) fn blame_token(self) -> Self {
        match self {
            HandlerError::Protocol(_) => HandlerError::Protocol(OaiError::BadResumptionToken),
            fault @ HandlerError::Fault(_) => fault,
        }
    }
}

pub(crate) type HandlerResult<T> = Result<T, HandlerError>;
