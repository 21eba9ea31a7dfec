//! Argument validation for protocol requests.
//!
//! Validation short-circuits on the first failure, in a fixed order:
//! argument shape, then required fields. Resource lookups and result
//! cardinality are checked afterwards by the verb handlers.

use crate::datestamp::{DateConverter, Datestamp, Granularity};
use crate::error::{BadArgumentKind, OaiError, OaiResult};
use crate::request::{Argument, ArgumentMask, ArgumentSet, Verb};
use log::debug;

/// Check the shape of a request against the arguments its verb accepts.
///
/// Fails with `badArgument` when raw parsing found an unknown or repeated
/// argument, when an argument outside `allowed` is present, or when
/// `resumptionToken` is combined with any other argument.
pub fn validate_arguments(arguments: &ArgumentSet, allowed: ArgumentMask) -> OaiResult<()> {
    if let Some(defect) = arguments.defect() {
        return Err(OaiError::BadArgument(defect.clone()));
    }

    for argument in Argument::ALL {
        if arguments.get(argument).is_some() && !allowed.contains(argument) {
            debug!("Rejecting argument '{}' outside the verb mask", argument.name());
            return Err(OaiError::unexpected_argument(argument.name()));
        }
    }

    if arguments.resumption_token().is_some() {
        let combined = Argument::ALL
            .iter()
            .filter(|argument| **argument != Argument::ResumptionToken)
            .any(|argument| arguments.get(*argument).is_some());
        if combined {
            return Err(OaiError::BadArgument(
                BadArgumentKind::ExclusiveResumptionToken,
            ));
        }
    }

    Ok(())
}

/// Check that the arguments a verb requires are present.
pub fn validate_required(arguments: &ArgumentSet, verb: Verb) -> OaiResult<()> {
    match verb {
        Verb::GetRecord => {
            if arguments.identifier().is_none() {
                return Err(OaiError::missing_argument(Argument::Identifier.name()));
            }
            if arguments.metadata_prefix().is_none() {
                return Err(OaiError::missing_argument(Argument::MetadataPrefix.name()));
            }
        }
        Verb::ListRecords | Verb::ListIdentifiers => {
            if arguments.resumption_token().is_none() && arguments.metadata_prefix().is_none() {
                return Err(OaiError::missing_argument(Argument::MetadataPrefix.name()));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Run shape and required-field validation for the request's own verb.
pub fn validate(arguments: &ArgumentSet) -> OaiResult<()> {
    let verb = arguments.verb();
    validate_arguments(arguments, verb.allowed_arguments())?;
    validate_required(arguments, verb)
}

/// Validated `from`/`until` bounds of a list request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Datestamp>,
    pub until: Option<Datestamp>,
}

/// Decode and cross-check the `from` and `until` arguments.
///
/// Malformed values map to `badFromArgument`/`badUntilArgument`. Values
/// finer than the repository granularity, a mix of granularities, and a
/// `from` later than `until` are `badArgument`.
pub fn validate_date_range(
    from: Option<&str>,
    until: Option<&str>,
    granularity: Granularity,
    converter: &dyn DateConverter,
) -> OaiResult<DateRange> {
    let from = match from {
        Some(text) => Some(
            converter
                .try_decode(text)
                .ok_or(OaiError::BadFromArgument)?,
        ),
        None => None,
    };
    let until = match until {
        Some(text) => Some(
            converter
                .try_decode(text)
                .ok_or(OaiError::BadUntilArgument)?,
        ),
        None => None,
    };

    for (name, stamp) in [("from", from), ("until", until)] {
        if let Some(stamp) = stamp {
            if stamp.granularity() > granularity {
                return Err(OaiError::BadArgument(
                    BadArgumentKind::UnsupportedGranularity(name),
                ));
            }
        }
    }

    if let (Some(from), Some(until)) = (from, until) {
        if from.granularity() != until.granularity() {
            return Err(OaiError::BadArgument(BadArgumentKind::MixedGranularity));
        }
        if from.lower_bound() > until.upper_bound() {
            return Err(OaiError::BadArgument(BadArgumentKind::InvertedDateRange));
        }
    }

    Ok(DateRange { from, until })
}
