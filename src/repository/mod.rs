//! Repository contracts consumed by the dispatcher.
//!
//! The dispatcher never stores, indexes or queries records itself. It talks
//! to two narrow async contracts:
//!
//! - [`RecordRepository`] - single records and pages of records/headers
//! - [`MetadataFormatRepository`] - the metadata formats on offer
//!
//! Repository errors are faults, not protocol conditions: the dispatcher
//! interprets only "not found" (`None`) and "empty" (no records) and hands
//! every `Err` back to its caller.
//!
//! # Example Usage
//!
//! ```rust
//! use oai_pmh_provider::model::{MetadataFormat, RecordHeader, RecordMetadata};
//! use oai_pmh_provider::repository::{
//!     InMemoryFormatRepository, InMemoryRecordRepository, MetadataFormatRepository,
//!     RecordRepository,
//! };
//! use chrono::Utc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let formats = InMemoryFormatRepository::new();
//! formats.insert(MetadataFormat::oai_dc()).await;
//!
//! let records = InMemoryRecordRepository::new(50, chrono::Duration::hours(1));
//! records
//!     .insert(
//!         RecordHeader::new("oai:example:1", Utc::now()),
//!         vec![RecordMetadata::new("oai_dc", "<oai_dc:dc/>")],
//!     )
//!     .await;
//!
//! assert!(formats.get_by_prefix("oai_dc").await?.is_some());
//! assert!(records.get_record("oai:example:1", "oai_dc").await?.is_some());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;

pub use errors::RepositoryError;
pub use in_memory::{InMemoryFormatRepository, InMemoryRecordRepository};

use crate::datestamp::Datestamp;
use crate::model::{MetadataFormat, Record, RecordContainer};
use crate::resumption::ResumptionToken;
use chrono::{DateTime, Utc};
use std::future::Future;

/// Validated filter of a `ListRecords`/`ListIdentifiers` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub metadata_prefix: String,
    pub from: Option<Datestamp>,
    pub until: Option<Datestamp>,
    pub set: Option<String>,
    /// The dispatcher's current instant; issued tokens expire relative to it.
    pub requested_at: DateTime<Utc>,
}

impl ListQuery {
    pub fn new(metadata_prefix: impl Into<String>) -> Self {
        Self {
            metadata_prefix: metadata_prefix.into(),
            from: None,
            until: None,
            set: None,
            requested_at: Utc::now(),
        }
    }

    /// Whether a record stamped at `datestamp` falls inside the date range.
    pub fn matches_datestamp(&self, datestamp: &DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| *datestamp >= from.lower_bound())
            && self.until.is_none_or(|until| *datestamp <= until.upper_bound())
    }

    /// Whether a record with the given set memberships matches the set filter.
    ///
    /// Set specs are hierarchical: `physics` also selects `physics:optics`.
    pub fn matches_sets(&self, set_specs: &[String]) -> bool {
        match &self.set {
            None => true,
            Some(set) => set_specs.iter().any(|spec| {
                spec == set
                    || spec
                        .strip_prefix(set.as_str())
                        .is_some_and(|rest| rest.starts_with(':'))
            }),
        }
    }

    /// Build the token that continues this query at `cursor`.
    ///
    /// The datestamps are carried in the exact form they were requested in.
    pub fn resumption_token(&self, cursor: usize, expiration: DateTime<Utc>) -> ResumptionToken {
        ResumptionToken {
            metadata_prefix: self.metadata_prefix.clone(),
            from: self.from.map(|stamp| stamp.to_string()),
            until: self.until.map(|stamp| stamp.to_string()),
            set: self.set.clone(),
            expiration,
            cursor,
        }
    }
}

/// Source of records.
pub trait RecordRepository: Send + Sync {
    /// The error type returned by repository operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one record in one metadata format.
    ///
    /// Returns `None` when the identifier is unknown or the record is not
    /// available in the format.
    fn get_record(
        &self,
        identifier: &str,
        metadata_prefix: &str,
    ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send;

    /// Whether any record carries this identifier.
    fn contains(&self, identifier: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Fetch one page of full records.
    ///
    /// `token` is the decoded continuation of an earlier page, if any. The
    /// returned container carries a token exactly when more pages remain.
    fn list_records(
        &self,
        query: &ListQuery,
        token: Option<&ResumptionToken>,
    ) -> impl Future<Output = Result<RecordContainer, Self::Error>> + Send;

    /// Fetch one page of headers; records in the container have no metadata.
    fn list_identifiers(
        &self,
        query: &ListQuery,
        token: Option<&ResumptionToken>,
    ) -> impl Future<Output = Result<RecordContainer, Self::Error>> + Send;
}

/// Source of metadata format descriptors.
pub trait MetadataFormatRepository: Send + Sync {
    /// The error type returned by repository operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Look up a format by its prefix.
    fn get_by_prefix(
        &self,
        metadata_prefix: &str,
    ) -> impl Future<Output = Result<Option<MetadataFormat>, Self::Error>> + Send;

    /// All formats, in any order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<MetadataFormat>, Self::Error>> + Send;
}
