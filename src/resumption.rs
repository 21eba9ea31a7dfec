//! Resumption token codec.
//!
//! A resumption token is a self-contained cursor: it carries the filter of
//! the original list request, the offset of the next page and an expiry, so
//! no server-side session is needed between pages.
//!
//! # Wire Format
//!
//! `<payload>.<check>` where `payload` is the base64url (unpadded) JSON
//! serialization of the token and `check` is the base64url of the first six
//! bytes of the SHA-256 digest of `payload`. Any string that does not match
//! this shape, fails the check, or does not deserialize is malformed.
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use oai_pmh_provider::resumption::ResumptionToken;
//!
//! let token = ResumptionToken {
//!     metadata_prefix: "oai_dc".to_string(),
//!     from: Some("2020-01-01".to_string()),
//!     until: None,
//!     set: Some("physics".to_string()),
//!     expiration: Utc::now() + Duration::hours(1),
//!     cursor: 100,
//! };
//!
//! let encoded = token.encode();
//! let decoded = ResumptionToken::decode(&encoded).unwrap();
//! assert_eq!(decoded, token);
//! ```

use crate::error::OaiError;
use crate::request::{ArgumentSet, Verb};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

const CHECK_BYTES: usize = 6;

/// Pagination cursor for `ListRecords` and `ListIdentifiers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumptionToken {
    #[serde(rename = "p")]
    pub metadata_prefix: String,
    #[serde(rename = "f", default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(rename = "u", default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(rename = "e")]
    pub expiration: DateTime<Utc>,
    /// Offset of the next page; meaningful only to the record repository.
    #[serde(rename = "c")]
    pub cursor: usize,
}

/// Reasons a token string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Malformed resumption token")]
    Malformed,

    #[error("Resumption token expired at {0}")]
    Expired(DateTime<Utc>),
}

impl From<TokenError> for OaiError {
    fn from(_: TokenError) -> Self {
        OaiError::BadResumptionToken
    }
}

fn check_for(payload: &str) -> String {
    let digest = Sha256::digest(payload.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..CHECK_BYTES])
}

impl ResumptionToken {
    /// Encode the token into its opaque string form.
    pub fn encode(&self) -> String {
        // Serializing plain strings, integers and a timestamp cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(json);
        let check = check_for(&payload);
        format!("{}.{}", payload, check)
    }

    /// Decode a token string without checking its expiry.
    pub fn decode(text: &str) -> Result<Self, TokenError> {
        let (payload, check) = text.trim().split_once('.').ok_or(TokenError::Malformed)?;
        if payload.is_empty() || check != check_for(payload) {
            return Err(TokenError::Malformed);
        }
        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)
    }

    /// Decode a token string and reject it if it has expired at `now`.
    ///
    /// A token is expired once `now` reaches its expiration instant.
    pub fn decode_at(text: &str, now: DateTime<Utc>) -> Result<Self, TokenError> {
        let token = Self::decode(text)?;
        if token.is_expired_at(now) {
            return Err(TokenError::Expired(token.expiration));
        }
        Ok(token)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration
    }

    /// Rebuild the argument set of the list request this token continues.
    pub fn to_arguments(&self, verb: Verb) -> ArgumentSet {
        let mut arguments =
            ArgumentSet::for_verb(verb).with_metadata_prefix(self.metadata_prefix.clone());
        if let Some(from) = &self.from {
            arguments = arguments.with_from(from.clone());
        }
        if let Some(until) = &self.until {
            arguments = arguments.with_until(until.clone());
        }
        if let Some(set) = &self.set {
            arguments = arguments.with_set(set.clone());
        }
        arguments
    }
}
