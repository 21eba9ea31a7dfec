//! Identify handler.

use crate::document::identify_element;
use crate::provider::core::DataProvider;
use crate::provider::errors::HandlerResult;
use crate::repository::{MetadataFormatRepository, RecordRepository};
use crate::request::ArgumentSet;
use crate::validation;
use crate::xml::Element;

/// Handle `Identify`: no arguments, configuration echoed verbatim.
pub(crate) fn handle_identify<R: RecordRepository, F: MetadataFormatRepository>(
    provider: &DataProvider<R, F>,
    arguments: &ArgumentSet,
) -> HandlerResult<Element> {
    validation::validate(arguments)?;
    Ok(identify_element(&provider.config))
}
