//! Records, headers and metadata formats exchanged with repositories.
//!
//! These types are produced by the external repositories; the dispatcher
//! only reads them.

use crate::resumption::ResumptionToken;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A metadata format a repository can disseminate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataFormat {
    pub metadata_prefix: String,
    pub schema: String,
    pub metadata_namespace: String,
}

impl MetadataFormat {
    pub fn new(
        metadata_prefix: impl Into<String>,
        schema: impl Into<String>,
        metadata_namespace: impl Into<String>,
    ) -> Self {
        Self {
            metadata_prefix: metadata_prefix.into(),
            schema: schema.into(),
            metadata_namespace: metadata_namespace.into(),
        }
    }

    /// The Dublin Core format every OAI-PMH repository must support.
    pub fn oai_dc() -> Self {
        Self::new(
            "oai_dc",
            "http://www.openarchives.org/OAI/2.0/oai_dc.xsd",
            "http://www.openarchives.org/OAI/2.0/oai_dc/",
        )
    }
}

/// Status of a record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Deleted,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Deleted => "deleted",
        }
    }
}

/// Header of a record: identity, datestamp and set membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordHeader {
    pub identifier: String,
    pub datestamp: DateTime<Utc>,
    #[serde(default)]
    pub set_specs: Vec<String>,
    #[serde(default)]
    pub status: Option<RecordStatus>,
}

impl RecordHeader {
    pub fn new(identifier: impl Into<String>, datestamp: DateTime<Utc>) -> Self {
        Self {
            identifier: identifier.into(),
            datestamp,
            set_specs: Vec::new(),
            status: None,
        }
    }

    /// Add a set membership.
    pub fn with_set(mut self, set_spec: impl Into<String>) -> Self {
        self.set_specs.push(set_spec.into());
        self
    }

    /// Mark the header as deleted.
    pub fn deleted(mut self) -> Self {
        self.status = Some(RecordStatus::Deleted);
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.status == Some(RecordStatus::Deleted)
    }
}

/// Pre-rendered metadata body in one format.
///
/// The content is an XML fragment inserted verbatim inside `<metadata>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub metadata_prefix: String,
    pub content: String,
}

impl RecordMetadata {
    pub fn new(metadata_prefix: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            metadata_prefix: metadata_prefix.into(),
            content: content.into(),
        }
    }
}

/// A record as returned by the record repository.
///
/// `metadata` is absent for deleted records and for identifier-only
/// listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub header: RecordHeader,
    #[serde(default)]
    pub metadata: Option<RecordMetadata>,
}

impl Record {
    pub fn new(header: RecordHeader, metadata: Option<RecordMetadata>) -> Self {
        Self { header, metadata }
    }

    pub fn identifier(&self) -> &str {
        &self.header.identifier
    }
}

/// One page of a record listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordContainer {
    pub records: Vec<Record>,
    /// Token for the next page; `None` on the last (or only) page.
    pub resumption_token: Option<ResumptionToken>,
    /// Size of the complete list, when the repository knows it.
    pub complete_list_size: Option<usize>,
    /// Offset of the first record of this page in the complete list.
    pub cursor: usize,
}

impl RecordContainer {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether this page belongs to a list spanning several requests.
    pub fn is_paginated(&self) -> bool {
        self.resumption_token.is_some() || self.cursor > 0
    }
}
