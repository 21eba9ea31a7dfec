//! ListMetadataFormats handler.

use crate::document::metadata_format_element;
use crate::error::{OaiError, ProviderError};
use crate::provider::core::DataProvider;
use crate::provider::errors::HandlerResult;
use crate::repository::{MetadataFormatRepository, RecordRepository};
use crate::request::ArgumentSet;
use crate::validation;
use crate::xml::Element;
use log::debug;

/// Handle `ListMetadataFormats`.
///
/// An optional identifier must name an existing record. Formats are listed
/// in ascending prefix order.
pub(crate) async fn handle_list_metadata_formats<
    R: RecordRepository,
    F: MetadataFormatRepository,
>(
    provider: &DataProvider<R, F>,
    arguments: &ArgumentSet,
) -> HandlerResult<Element> {
    validation::validate(arguments)?;

    if let Some(identifier) = arguments.identifier() {
        let exists = provider
            .records
            .contains(identifier)
            .await
            .map_err(ProviderError::repository)?;
        if !exists {
            return Err(OaiError::IdDoesNotExist.into());
        }
    }

    let mut formats = provider
        .formats
        .get_all()
        .await
        .map_err(ProviderError::repository)?;
    formats.sort_by(|a, b| a.metadata_prefix.cmp(&b.metadata_prefix));

    if formats.is_empty() {
        return Err(OaiError::NoMetadataFormats.into());
    }

    debug!("Listing {} metadata formats", formats.len());
    Ok(formats
        .iter()
        .fold(Element::oai("ListMetadataFormats"), |element, format| {
            element.with_child(metadata_format_element(format))
        }))
}
