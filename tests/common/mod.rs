//! Shared fixtures for provider integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use oai_pmh_provider::datestamp::{DateConverter, Datestamp, Granularity};
use oai_pmh_provider::model::{
    MetadataFormat, Record, RecordContainer, RecordHeader, RecordMetadata,
};
use oai_pmh_provider::repository::{
    InMemoryFormatRepository, InMemoryRecordRepository, ListQuery, MetadataFormatRepository,
    RecordRepository, RepositoryError,
};
use oai_pmh_provider::{DataProvider, ProviderConfig, ResumptionToken};
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Route `log` output to the test harness once per binary.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// The instant every fixture clock reports.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Date converter whose clock never moves.
pub struct FixedClock(pub DateTime<Utc>);

impl DateConverter for FixedClock {
    fn encode(&self, granularity: Granularity, value: &DateTime<Utc>) -> String {
        granularity.encode(value)
    }

    fn try_decode(&self, text: &str) -> Option<Datestamp> {
        Datestamp::parse(text)
    }

    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn sample_config() -> ProviderConfig {
    ProviderConfig {
        repository_name: "Sample".to_string(),
        base_url: "http://x/oai".to_string(),
        protocol_version: "2.0".to_string(),
        earliest_datestamp: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
        ..ProviderConfig::default()
    }
}

pub fn marc_format() -> MetadataFormat {
    MetadataFormat::new(
        "marc21",
        "http://www.loc.gov/standards/marcxml/schema/MARC21slim.xsd",
        "http://www.loc.gov/MARC21/slim",
    )
}

pub fn oai_dc(identifier: &str) -> RecordMetadata {
    RecordMetadata::new(
        "oai_dc",
        format!("<dc xmlns=\"http://purl.org/dc/elements/1.1/\"><title>{identifier}</title></dc>"),
    )
}

/// Records `oai:x:1` to `oai:x:{count}`, one per day from 2020-01-01.
///
/// Odd records are in set `physics:optics`, even ones in `math`. Only
/// `oai_dc` metadata is stored.
pub async fn populated_records(count: u32, page_size: usize) -> InMemoryRecordRepository {
    let records = InMemoryRecordRepository::new(page_size, Duration::hours(1));
    for n in 1..=count {
        let datestamp = Utc.with_ymd_and_hms(2020, 1, 1, 10, 0, 0).unwrap() + Duration::days(i64::from(n) - 1);
        let identifier = format!("oai:x:{n}");
        let set = if n % 2 == 1 { "physics:optics" } else { "math" };
        let header = RecordHeader::new(identifier.clone(), datestamp).with_set(set);
        records.insert(header, vec![oai_dc(&identifier)]).await;
    }
    records
}

pub async fn standard_formats() -> InMemoryFormatRepository {
    let formats = InMemoryFormatRepository::new();
    formats.insert(MetadataFormat::oai_dc()).await;
    formats.insert(marc_format()).await;
    formats
}

pub type InMemoryProvider = DataProvider<InMemoryRecordRepository, InMemoryFormatRepository>;

pub fn provider_with(
    config: ProviderConfig,
    records: InMemoryRecordRepository,
    formats: InMemoryFormatRepository,
) -> InMemoryProvider {
    init_logging();
    DataProvider::with_date_converter(config, records, formats, Arc::new(FixedClock(fixed_now())))
        .expect("valid test configuration")
}

/// Provider over five records, pages of two, both formats registered.
pub async fn standard_provider() -> InMemoryProvider {
    provider_with(
        sample_config(),
        populated_records(5, 2).await,
        standard_formats().await,
    )
}

/// A token for `oai_dc` that expires at `expiration`.
pub fn token_expiring_at(expiration: DateTime<Utc>) -> String {
    ResumptionToken {
        metadata_prefix: "oai_dc".to_string(),
        from: None,
        until: None,
        set: None,
        expiration,
        cursor: 2,
    }
    .encode()
}

/// Repository whose every call fails, for fault propagation tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingRepository;

impl RecordRepository for FailingRepository {
    type Error = RepositoryError;

    async fn get_record(
        &self,
        _identifier: &str,
        _metadata_prefix: &str,
    ) -> Result<Option<Record>, Self::Error> {
        Err(RepositoryError::unavailable("backend offline"))
    }

    async fn contains(&self, _identifier: &str) -> Result<bool, Self::Error> {
        Err(RepositoryError::unavailable("backend offline"))
    }

    async fn list_records(
        &self,
        _query: &ListQuery,
        _token: Option<&ResumptionToken>,
    ) -> Result<RecordContainer, Self::Error> {
        Err(RepositoryError::unavailable("backend offline"))
    }

    async fn list_identifiers(
        &self,
        _query: &ListQuery,
        _token: Option<&ResumptionToken>,
    ) -> Result<RecordContainer, Self::Error> {
        Err(RepositoryError::unavailable("backend offline"))
    }
}

impl MetadataFormatRepository for FailingRepository {
    type Error = RepositoryError;

    async fn get_by_prefix(
        &self,
        _metadata_prefix: &str,
    ) -> Result<Option<MetadataFormat>, Self::Error> {
        Err(RepositoryError::unavailable("backend offline"))
    }

    async fn get_all(&self) -> Result<Vec<MetadataFormat>, Self::Error> {
        Err(RepositoryError::unavailable("backend offline"))
    }
}
