//! Core data provider structure and verb dispatch.
//!
//! Each request is classified and handled independently; the only state
//! carried between requests is the opaque resumption token.

use crate::config::ProviderConfig;
use crate::datestamp::{DateConverter, UtcDateConverter};
use crate::document::{OaiResponse, RequestEcho, ResponseBody, build_document};
use crate::error::{BuildResult, OaiError, ProviderResult};
use crate::provider::errors::HandlerError;
use crate::provider::handlers;
use crate::repository::{MetadataFormatRepository, RecordRepository};
use crate::request::{ArgumentSet, Verb};
use log::{debug, info, warn};
use std::sync::Arc;

/// OAI-PMH data provider.
///
/// Validates requests, queries the repositories and renders complete
/// response documents. Protocol errors are part of the returned
/// [`OaiResponse`]; only repository and rendering faults are `Err`.
///
/// # Type Parameters
///
/// * `R` - The record repository
/// * `F` - The metadata format repository
///
/// # Examples
///
/// ```rust
/// use oai_pmh_provider::{ArgumentSet, DataProvider, ProviderConfig};
/// use oai_pmh_provider::repository::{InMemoryFormatRepository, InMemoryRecordRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = DataProvider::new(
///     ProviderConfig::default(),
///     InMemoryRecordRepository::default(),
///     InMemoryFormatRepository::new(),
/// )?;
///
/// let response = provider.handle(&ArgumentSet::new("Identify")).await?;
/// assert!(!response.is_error());
/// println!("{}", response.to_xml()?);
/// # Ok(())
/// # }
/// ```
pub struct DataProvider<R, F> {
    pub(super) config: ProviderConfig,
    pub(super) records: R,
    pub(super) formats: F,
    pub(super) dates: Arc<dyn DateConverter>,
}

impl<R: RecordRepository, F: MetadataFormatRepository> DataProvider<R, F> {
    /// Create a provider with the system clock date converter.
    ///
    /// # Errors
    ///
    /// Returns a `BuildError` if the configuration is invalid.
    pub fn new(config: ProviderConfig, records: R, formats: F) -> BuildResult<Self> {
        Self::with_date_converter(config, records, formats, Arc::new(UtcDateConverter))
    }

    /// Create a provider with an explicit date converter.
    pub fn with_date_converter(
        config: ProviderConfig,
        records: R,
        formats: F,
        dates: Arc<dyn DateConverter>,
    ) -> BuildResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            records,
            formats,
            dates,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    pub fn formats(&self) -> &F {
        &self.formats
    }

    /// Handle raw key/value request arguments, e.g. a parsed query string.
    pub async fn handle_pairs<I, K, V>(&self, pairs: I) -> ProviderResult<OaiResponse>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let arguments = ArgumentSet::from_pairs(pairs);
        self.handle(&arguments).await
    }

    /// Handle one request.
    ///
    /// This is the main entry point that dispatches to the handler of the
    /// request's verb and wraps the outcome in the response envelope.
    pub async fn handle(&self, arguments: &ArgumentSet) -> ProviderResult<OaiResponse> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let verb = arguments.verb();
        let now = self.dates.now();

        info!(
            "OAI-PMH provider processing {} (request: '{}')",
            arguments.verb_name().unwrap_or("<none>"),
            request_id
        );

        let outcome = match verb {
            Verb::Identify => handlers::identify::handle_identify(self, arguments),
            Verb::ListMetadataFormats => {
                handlers::formats::handle_list_metadata_formats(self, arguments).await
            }
            Verb::GetRecord => handlers::records::handle_get_record(self, arguments).await,
            Verb::ListRecords | Verb::ListIdentifiers => {
                handlers::records::handle_list(self, arguments, verb, now).await
            }
            Verb::ListSets => handlers::sets::handle_list_sets(self, arguments),
            Verb::Unrecognized => Err(OaiError::BadVerb.into()),
        };

        let body = match outcome {
            Ok(payload) => {
                debug!(
                    "OAI-PMH provider completed {} successfully (request: '{}')",
                    verb, request_id
                );
                ResponseBody::Payload(payload)
            }
            Err(HandlerError::Protocol(error)) => {
                match error.bad_argument_kind() {
                    Some(kind) => warn!(
                        "OAI-PMH request failed with {}: {} (request: '{}')",
                        error.code(),
                        kind,
                        request_id
                    ),
                    None => warn!(
                        "OAI-PMH request failed with {} (request: '{}')",
                        error.code(),
                        request_id
                    ),
                }
                ResponseBody::Error(error)
            }
            Err(HandlerError::Fault(fault)) => {
                warn!(
                    "OAI-PMH provider fault: {} (request: '{}')",
                    fault, request_id
                );
                return Err(fault);
            }
        };

        let response_date = self.dates.encode(self.config.granularity, &now);
        let echo = RequestEcho::new(self.config.base_url.clone(), arguments);
        let document = build_document(&response_date, &echo, &body);
        let error = match body {
            ResponseBody::Error(error) => Some(error),
            ResponseBody::Payload(_) => None,
        };

        Ok(OaiResponse::new(verb, now, error, document))
    }
}
