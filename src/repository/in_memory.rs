//! In-memory repository implementations.
//!
//! Thread-safe repositories backed by ordered maps behind a tokio `RwLock`.
//! They are meant for tests, demos and small static collections.
//!
//! # Behavior
//!
//! * Records are listed in identifier order
//! * Pages hold at most `page_size` records
//! * Issued resumption tokens expire `token_ttl` after the query's
//!   `requested_at` instant
//! * Deleted records are listed with their header only

use crate::config::ProviderConfig;
use crate::model::{MetadataFormat, Record, RecordContainer, RecordHeader, RecordMetadata};
use crate::repository::{
    ListQuery, MetadataFormatRepository, RecordRepository, RepositoryError,
};
use crate::resumption::ResumptionToken;
use chrono::Duration;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredItem {
    header: RecordHeader,
    // metadata prefix -> pre-rendered content
    metadata: HashMap<String, String>,
}

impl StoredItem {
    fn to_record(&self, metadata_prefix: &str, with_metadata: bool) -> Record {
        let metadata = if with_metadata && !self.header.is_deleted() {
            self.metadata
                .get(metadata_prefix)
                .map(|content| RecordMetadata::new(metadata_prefix, content.clone()))
        } else {
            None
        };
        Record::new(self.header.clone(), metadata)
    }
}

/// In-memory record repository.
#[derive(Clone)]
pub struct InMemoryRecordRepository {
    // identifier -> item
    items: Arc<RwLock<BTreeMap<String, StoredItem>>>,
    page_size: usize,
    token_ttl: Duration,
}

impl InMemoryRecordRepository {
    /// Create an empty repository serving pages of `page_size` records.
    ///
    /// A `page_size` of zero is treated as one.
    pub fn new(page_size: usize, token_ttl: Duration) -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
            page_size: page_size.max(1),
            token_ttl,
        }
    }

    /// Create an empty repository using the paging settings of a provider
    /// configuration.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(config.page_size, config.resumption_token_ttl())
    }

    /// Store a record with its metadata in each available format.
    ///
    /// Replaces any record with the same identifier.
    pub async fn insert(&self, header: RecordHeader, metadata: Vec<RecordMetadata>) {
        let metadata = metadata
            .into_iter()
            .map(|entry| (entry.metadata_prefix, entry.content))
            .collect();
        let mut items = self.items.write().await;
        items.insert(header.identifier.clone(), StoredItem { header, metadata });
    }

    /// Remove a record entirely.
    pub async fn remove(&self, identifier: &str) -> bool {
        self.items.write().await.remove(identifier).is_some()
    }

    /// Number of stored records, deleted ones included.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    async fn page(
        &self,
        query: &ListQuery,
        token: Option<&ResumptionToken>,
        with_metadata: bool,
    ) -> RecordContainer {
        let items = self.items.read().await;
        let matching: Vec<&StoredItem> = items
            .values()
            .filter(|item| item.metadata.contains_key(&query.metadata_prefix))
            .filter(|item| query.matches_datestamp(&item.header.datestamp))
            .filter(|item| query.matches_sets(&item.header.set_specs))
            .collect();

        let total = matching.len();
        let offset = token.map(|token| token.cursor).unwrap_or(0);
        let records: Vec<Record> = matching
            .iter()
            .skip(offset)
            .take(self.page_size)
            .map(|item| item.to_record(&query.metadata_prefix, with_metadata))
            .collect();

        let next = offset + records.len();
        let resumption_token = if !records.is_empty() && next < total {
            Some(query.resumption_token(next, query.requested_at + self.token_ttl))
        } else {
            None
        };

        RecordContainer {
            records,
            resumption_token,
            complete_list_size: Some(total),
            cursor: offset,
        }
    }
}

impl Default for InMemoryRecordRepository {
    fn default() -> Self {
        Self::new(100, Duration::hours(1))
    }
}

impl RecordRepository for InMemoryRecordRepository {
    type Error = RepositoryError;

    async fn get_record(
        &self,
        identifier: &str,
        metadata_prefix: &str,
    ) -> Result<Option<Record>, Self::Error> {
        let items = self.items.read().await;
        Ok(items
            .get(identifier)
            .filter(|item| item.metadata.contains_key(metadata_prefix))
            .map(|item| item.to_record(metadata_prefix, true)))
    }

    async fn contains(&self, identifier: &str) -> Result<bool, Self::Error> {
        Ok(self.items.read().await.contains_key(identifier))
    }

    async fn list_records(
        &self,
        query: &ListQuery,
        token: Option<&ResumptionToken>,
    ) -> Result<RecordContainer, Self::Error> {
        Ok(self.page(query, token, true).await)
    }

    async fn list_identifiers(
        &self,
        query: &ListQuery,
        token: Option<&ResumptionToken>,
    ) -> Result<RecordContainer, Self::Error> {
        Ok(self.page(query, token, false).await)
    }
}

/// In-memory metadata format repository keyed by prefix.
#[derive(Clone, Default)]
pub struct InMemoryFormatRepository {
    formats: Arc<RwLock<BTreeMap<String, MetadataFormat>>>,
}

impl InMemoryFormatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a format, replacing any format with the same prefix.
    pub async fn insert(&self, format: MetadataFormat) {
        let mut formats = self.formats.write().await;
        formats.insert(format.metadata_prefix.clone(), format);
    }
}

impl MetadataFormatRepository for InMemoryFormatRepository {
    type Error = RepositoryError;

    async fn get_by_prefix(
        &self,
        metadata_prefix: &str,
    ) -> Result<Option<MetadataFormat>, Self::Error> {
        Ok(self.formats.read().await.get(metadata_prefix).cloned())
    }

    async fn get_all(&self) -> Result<Vec<MetadataFormat>, Self::Error> {
        Ok(self.formats.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datestamp::Datestamp;
    use chrono::{TimeZone, Utc};

    async fn repository(page_size: usize) -> InMemoryRecordRepository {
        let repository = InMemoryRecordRepository::new(page_size, Duration::hours(1));
        for day in 1..=5u32 {
            let datestamp = Utc.with_ymd_and_hms(2020, 1, day, 12, 0, 0).unwrap();
            let mut header = RecordHeader::new(format!("oai:test:{}", day), datestamp);
            if day % 2 == 0 {
                header = header.with_set("even");
            }
            repository
                .insert(
                    header,
                    vec![RecordMetadata::new("oai_dc", format!("<dc>{}</dc>", day))],
                )
                .await;
        }
        repository
    }

    #[tokio::test]
    async fn test_get_record() {
        let repository = repository(10).await;
        let record = repository
            .get_record("oai:test:1", "oai_dc")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.identifier(), "oai:test:1");
        assert_eq!(record.metadata.unwrap().content, "<dc>1</dc>");

        assert!(repository.get_record("oai:test:1", "marc").await.unwrap().is_none());
        assert!(repository.get_record("oai:test:9", "oai_dc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pagination() {
        let repository = repository(2).await;
        let query = ListQuery::new("oai_dc");

        let first = repository.list_records(&query, None).await.unwrap();
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.complete_list_size, Some(5));
        assert_eq!(first.cursor, 0);
        let token = first.resumption_token.unwrap();
        assert_eq!(token.cursor, 2);

        let second = repository.list_records(&query, Some(&token)).await.unwrap();
        assert_eq!(second.records[0].identifier(), "oai:test:3");

        let token = second.resumption_token.unwrap();
        let last = repository.list_records(&query, Some(&token)).await.unwrap();
        assert_eq!(last.records.len(), 1);
        assert!(last.resumption_token.is_none());
        assert!(last.is_paginated());
    }

    #[tokio::test]
    async fn test_token_expires_relative_to_query_instant() {
        let repository = repository(2).await;
        let mut query = ListQuery::new("oai_dc");
        query.requested_at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

        let page = repository.list_identifiers(&query, None).await.unwrap();
        let token = page.resumption_token.unwrap();
        assert_eq!(
            token.expiration,
            Utc.with_ymd_and_hms(2030, 1, 1, 1, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_filters() {
        let repository = repository(10).await;
        let mut query = ListQuery::new("oai_dc");
        query.set = Some("even".to_string());
        let page = repository.list_identifiers(&query, None).await.unwrap();
        assert_eq!(page.records.len(), 2);
        assert!(page.records.iter().all(|r| r.metadata.is_none()));

        let mut query = ListQuery::new("oai_dc");
        query.from = Datestamp::parse("2020-01-02");
        query.until = Datestamp::parse("2020-01-03");
        let page = repository.list_records(&query, None).await.unwrap();
        let ids: Vec<&str> = page.records.iter().map(|r| r.identifier()).collect();
        assert_eq!(ids, vec!["oai:test:2", "oai:test:3"]);
        assert!(!page.is_paginated());
    }

    #[tokio::test]
    async fn test_deleted_record_has_no_metadata() {
        let repository = InMemoryRecordRepository::default();
        repository
            .insert(
                RecordHeader::new("oai:test:gone", Utc::now()).deleted(),
                vec![RecordMetadata::new("oai_dc", "<dc/>")],
            )
            .await;
        let record = repository
            .get_record("oai:test:gone", "oai_dc")
            .await
            .unwrap()
            .unwrap();
        assert!(record.header.is_deleted());
        assert!(record.metadata.is_none());
    }

    #[test]
    fn test_from_config() {
        let config = ProviderConfig {
            page_size: 7,
            resumption_token_ttl_secs: 60,
            ..ProviderConfig::default()
        };
        let repository = InMemoryRecordRepository::from_config(&config);
        assert_eq!(repository.page_size, 7);
        assert_eq!(repository.token_ttl, Duration::seconds(60));
    }

    #[tokio::test]
    async fn test_format_repository() {
        let formats = InMemoryFormatRepository::new();
        formats.insert(MetadataFormat::oai_dc()).await;
        formats
            .insert(MetadataFormat::new("marc21", "http://x/marc.xsd", "http://x/marc"))
            .await;
        assert_eq!(formats.get_all().await.unwrap().len(), 2);
        assert!(formats.get_by_prefix("marc21").await.unwrap().is_some());
        assert!(formats.get_by_prefix("mods").await.unwrap().is_none());
    }
}
