//! The argument set of a single protocol request.

use crate::error::BadArgumentKind;
use crate::request::verb::{Argument, ArgumentMask, Verb};

/// Arguments of one request.
///
/// Blank values are treated as absent, so an argument is either `None` or a
/// non-empty string. The set is immutable once handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArgumentSet {
    verb: Option<String>,
    identifier: Option<String>,
    metadata_prefix: Option<String>,
    resumption_token: Option<String>,
    from: Option<String>,
    until: Option<String>,
    set: Option<String>,
    verb_repeated: bool,
    defect: Option<BadArgumentKind>,
}

fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl ArgumentSet {
    /// Create an argument set for the given verb name.
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: non_blank(verb),
            ..Self::default()
        }
    }

    /// Create an argument set for a known verb.
    pub fn for_verb(verb: Verb) -> Self {
        Self {
            verb: verb.name().map(str::to_string),
            ..Self::default()
        }
    }

    /// Parse raw key/value pairs, for example a decoded query string.
    ///
    /// A repeated `verb` makes the request unrecognized. Unknown argument
    /// names and repeated arguments are kept as a defect that validation
    /// reports as `badArgument`; the first defect wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut arguments = Self::default();
        let mut verb_seen = false;
        // Blank values are stored as absent, so repetition is tracked by name.
        let mut seen = ArgumentMask::EMPTY;

        for (key, value) in pairs {
            let key = key.as_ref();
            if key == "verb" {
                if verb_seen {
                    arguments.verb_repeated = true;
                } else {
                    arguments.verb = non_blank(value);
                }
                verb_seen = true;
                continue;
            }

            match Argument::from_name(key) {
                Some(argument) => {
                    if seen.contains(argument) {
                        arguments.record_defect(BadArgumentKind::Repeated(key.to_string()));
                    } else {
                        seen = seen | argument;
                        arguments.set_value(argument, value);
                    }
                }
                None => arguments.record_defect(BadArgumentKind::Unknown(key.to_string())),
            }
        }

        arguments
    }

    fn record_defect(&mut self, defect: BadArgumentKind) {
        if self.defect.is_none() {
            self.defect = Some(defect);
        }
    }

    fn set_value(&mut self, argument: Argument, value: impl Into<String>) {
        let value = non_blank(value);
        match argument {
            Argument::Identifier => self.identifier = value,
            Argument::MetadataPrefix => self.metadata_prefix = value,
            Argument::ResumptionToken => self.resumption_token = value,
            Argument::From => self.from = value,
            Argument::Until => self.until = value,
            Argument::Set => self.set = value,
        }
    }

    /// Set the identifier argument.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.set_value(Argument::Identifier, identifier);
        self
    }

    /// Set the metadataPrefix argument.
    pub fn with_metadata_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.set_value(Argument::MetadataPrefix, prefix);
        self
    }

    /// Set the resumptionToken argument.
    pub fn with_resumption_token(mut self, token: impl Into<String>) -> Self {
        self.set_value(Argument::ResumptionToken, token);
        self
    }

    /// Set the from argument.
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.set_value(Argument::From, from);
        self
    }

    /// Set the until argument.
    pub fn with_until(mut self, until: impl Into<String>) -> Self {
        self.set_value(Argument::Until, until);
        self
    }

    /// Set the set argument.
    pub fn with_set(mut self, set: impl Into<String>) -> Self {
        self.set_value(Argument::Set, set);
        self
    }

    /// The verb this request asks for.
    pub fn verb(&self) -> Verb {
        if self.verb_repeated {
            Verb::Unrecognized
        } else {
            Verb::from_name(self.verb.as_deref())
        }
    }

    /// The verb exactly as supplied.
    pub fn verb_name(&self) -> Option<&str> {
        self.verb.as_deref()
    }

    /// Value of an optional argument.
    pub fn get(&self, argument: Argument) -> Option<&str> {
        match argument {
            Argument::Identifier => self.identifier.as_deref(),
            Argument::MetadataPrefix => self.metadata_prefix.as_deref(),
            Argument::ResumptionToken => self.resumption_token.as_deref(),
            Argument::From => self.from.as_deref(),
            Argument::Until => self.until.as_deref(),
            Argument::Set => self.set.as_deref(),
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn metadata_prefix(&self) -> Option<&str> {
        self.metadata_prefix.as_deref()
    }

    pub fn resumption_token(&self) -> Option<&str> {
        self.resumption_token.as_deref()
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn until(&self) -> Option<&str> {
        self.until.as_deref()
    }

    pub fn set(&self) -> Option<&str> {
        self.set.as_deref()
    }

    /// A defect found while parsing raw pairs, if any.
    pub(crate) fn defect(&self) -> Option<&BadArgumentKind> {
        self.defect.as_ref()
    }

    /// Supplied arguments in echo order, including the verb.
    pub fn supplied(&self) -> Vec<(&'static str, &str)> {
        let mut supplied = Vec::with_capacity(7);
        if let Some(verb) = self.verb.as_deref() {
            supplied.push(("verb", verb));
        }
        for argument in Argument::ALL {
            if let Some(value) = self.get(argument) {
                supplied.push((argument.name(), value));
            }
        }
        supplied
    }
}
