//! GetRecord, ListRecords and ListIdentifiers handlers.

use crate::document::{header_element, record_element, resumption_token_element};
use crate::error::{OaiError, ProviderError};
use crate::provider::core::DataProvider;
use crate::provider::errors::{HandlerError, HandlerResult};
use crate::repository::{ListQuery, MetadataFormatRepository, RecordRepository};
use crate::request::{Argument, ArgumentSet, Verb};
use crate::resumption::ResumptionToken;
use crate::validation;
use crate::xml::Element;
use chrono::{DateTime, Utc};
use log::debug;

/// Fail with `cannotDisseminateFormat` unless the prefix is registered.
async fn require_format<R: RecordRepository, F: MetadataFormatRepository>(
    provider: &DataProvider<R, F>,
    metadata_prefix: &str,
) -> HandlerResult<()> {
    let format = provider
        .formats
        .get_by_prefix(metadata_prefix)
        .await
        .map_err(ProviderError::repository)?;
    if format.is_none() {
        return Err(OaiError::CannotDisseminateFormat.into());
    }
    Ok(())
}

/// Handle `GetRecord`.
///
/// The metadata prefix is checked before the record is looked up, so an
/// unknown format is reported as such even for an existing identifier.
pub(crate) async fn handle_get_record<R: RecordRepository, F: MetadataFormatRepository>(
    provider: &DataProvider<R, F>,
    arguments: &ArgumentSet,
) -> HandlerResult<Element> {
    validation::validate(arguments)?;
    let identifier = arguments
        .identifier()
        .ok_or_else(|| OaiError::missing_argument(Argument::Identifier.name()))?;
    let metadata_prefix = arguments
        .metadata_prefix()
        .ok_or_else(|| OaiError::missing_argument(Argument::MetadataPrefix.name()))?;

    require_format(provider, metadata_prefix).await?;

    let record = provider
        .records
        .get_record(identifier, metadata_prefix)
        .await
        .map_err(ProviderError::repository)?
        .ok_or(OaiError::IdDoesNotExist)?;

    Ok(Element::oai("GetRecord").with_child(record_element(&record, provider.config.granularity)))
}

/// Handle `ListRecords` and `ListIdentifiers`.
///
/// A resumption token is decoded (and checked for expiry against `now`)
/// into the argument set of the original request, which then goes through
/// the same validation and query path as a fresh request. This happens in
/// one step; a decoded token never carries another token. Any protocol
/// condition raised by the decoded arguments, an unknown metadata prefix
/// included, is reported as `badResumptionToken`.
pub(crate) async fn handle_list<R: RecordRepository, F: MetadataFormatRepository>(
    provider: &DataProvider<R, F>,
    arguments: &ArgumentSet,
    verb: Verb,
    now: DateTime<Utc>,
) -> HandlerResult<Element> {
    validation::validate(arguments)?;

    let continuation = match arguments.resumption_token() {
        Some(encoded) => Some(ResumptionToken::decode_at(encoded, now)?),
        None => None,
    };

    let query = match &continuation {
        Some(token) => {
            debug!("Resuming {} at cursor {}", verb, token.cursor);
            let rebuilt = token.to_arguments(verb);
            validation::validate(&rebuilt).map_err(|e| HandlerError::from(e).blame_token())?;
            resolve_query(provider, &rebuilt, now)
                .await
                .map_err(HandlerError::blame_token)?
        }
        None => resolve_query(provider, arguments, now).await?,
    };

    let page = if verb == Verb::ListRecords {
        provider
            .records
            .list_records(&query, continuation.as_ref())
            .await
    } else {
        provider
            .records
            .list_identifiers(&query, continuation.as_ref())
            .await
    };
    let container = page.map_err(ProviderError::repository)?;

    if container.is_empty() {
        return Err(OaiError::NoRecordsMatch.into());
    }

    debug!(
        "{} page holds {} records (cursor {})",
        verb,
        container.records.len(),
        container.cursor
    );

    let granularity = provider.config.granularity;
    let mut element = Element::oai(verb.to_string());
    for record in &container.records {
        let child = if verb == Verb::ListRecords {
            record_element(record, granularity)
        } else {
            header_element(&record.header, granularity)
        };
        element.push_child(child);
    }
    if let Some(token) = resumption_token_element(&container) {
        element.push_child(token);
    }
    Ok(element)
}

/// Turn validated list arguments into a repository query.
///
/// Checks run in a fixed order: set support, dates, metadata prefix.
async fn resolve_query<R: RecordRepository, F: MetadataFormatRepository>(
    provider: &DataProvider<R, F>,
    arguments: &ArgumentSet,
    now: DateTime<Utc>,
) -> HandlerResult<ListQuery> {
    if arguments.set().is_some() && !provider.config.supports_sets {
        return Err(OaiError::NoSetHierarchy.into());
    }

    let range = validation::validate_date_range(
        arguments.from(),
        arguments.until(),
        provider.config.granularity,
        provider.dates.as_ref(),
    )?;

    let metadata_prefix = arguments
        .metadata_prefix()
        .ok_or_else(|| OaiError::missing_argument(Argument::MetadataPrefix.name()))?;
    require_format(provider, metadata_prefix).await?;

    Ok(ListQuery {
        metadata_prefix: metadata_prefix.to_string(),
        from: range.from,
        until: range.until,
        set: arguments.set().map(str::to_string),
        requested_at: now,
    })
}
