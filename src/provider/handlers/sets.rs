//! ListSets handler.
//!
//! This provider exposes no set hierarchy: set membership can be used to
//! filter list requests, but the sets themselves are not listed.

use crate::error::OaiError;
use crate::provider::core::DataProvider;
use crate::provider::errors::HandlerResult;
use crate::repository::{MetadataFormatRepository, RecordRepository};
use crate::request::ArgumentSet;
use crate::validation;
use crate::xml::Element;

/// Handle `ListSets`.
///
/// No `ListSets` token is ever issued, so any supplied token is invalid;
/// otherwise the answer is always `noSetHierarchy`. This holds even when
/// `supports_sets` is enabled: that flag only lets list requests filter by
/// the set specs carried in record headers, and there is no set repository
/// to enumerate set names or descriptions from.
pub(crate) fn handle_list_sets<R: RecordRepository, F: MetadataFormatRepository>(
    _provider: &DataProvider<R, F>,
    arguments: &ArgumentSet,
) -> HandlerResult<Element> {
    validation::validate(arguments)?;
    if arguments.resumption_token().is_some() {
        return Err(OaiError::BadResumptionToken.into());
    }
    Err(OaiError::NoSetHierarchy.into())
}
