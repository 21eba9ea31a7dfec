//! Protocol verbs and the arguments each one accepts.

use std::convert::Infallible;
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// The operation requested by a harvester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Identify,
    ListMetadataFormats,
    ListRecords,
    ListIdentifiers,
    GetRecord,
    ListSets,
    /// Missing, repeated or unknown verb
    Unrecognized,
}

impl Verb {
    /// Classify a raw verb value. Matching is case-sensitive.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("Identify") => Verb::Identify,
            Some("ListMetadataFormats") => Verb::ListMetadataFormats,
            Some("ListRecords") => Verb::ListRecords,
            Some("ListIdentifiers") => Verb::ListIdentifiers,
            Some("GetRecord") => Verb::GetRecord,
            Some("ListSets") => Verb::ListSets,
            _ => Verb::Unrecognized,
        }
    }

    /// Protocol name of the verb, used as the payload element name.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Verb::Identify => Some("Identify"),
            Verb::ListMetadataFormats => Some("ListMetadataFormats"),
            Verb::ListRecords => Some("ListRecords"),
            Verb::ListIdentifiers => Some("ListIdentifiers"),
            Verb::GetRecord => Some("GetRecord"),
            Verb::ListSets => Some("ListSets"),
            Verb::Unrecognized => None,
        }
    }

    /// Arguments the verb accepts besides `verb` itself.
    pub fn allowed_arguments(&self) -> ArgumentMask {
        match self {
            Verb::Identify | Verb::Unrecognized => ArgumentMask::EMPTY,
            Verb::ListMetadataFormats => Argument::Identifier.into(),
            Verb::GetRecord => Argument::Identifier | Argument::MetadataPrefix,
            Verb::ListRecords | Verb::ListIdentifiers => {
                Argument::MetadataPrefix
                    | Argument::From
                    | Argument::Until
                    | Argument::Set
                    | Argument::ResumptionToken
            }
            Verb::ListSets => Argument::ResumptionToken.into(),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("Unrecognized"))
    }
}

impl FromStr for Verb {
    type Err = Infallible;

    /// Never fails: anything that is not a protocol verb is `Unrecognized`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Verb::from_name(Some(s)))
    }
}

/// Optional protocol arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument {
    Identifier,
    MetadataPrefix,
    ResumptionToken,
    From,
    Until,
    Set,
}

impl Argument {
    /// All arguments in request-echo order.
    pub const ALL: [Argument; 6] = [
        Argument::Identifier,
        Argument::MetadataPrefix,
        Argument::From,
        Argument::Until,
        Argument::Set,
        Argument::ResumptionToken,
    ];

    /// Protocol name of the argument.
    pub fn name(&self) -> &'static str {
        match self {
            Argument::Identifier => "identifier",
            Argument::MetadataPrefix => "metadataPrefix",
            Argument::ResumptionToken => "resumptionToken",
            Argument::From => "from",
            Argument::Until => "until",
            Argument::Set => "set",
        }
    }

    /// Look up an argument by its protocol name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|argument| argument.name() == name)
    }

    fn bit(&self) -> u8 {
        match self {
            Argument::Identifier => 1,
            Argument::MetadataPrefix => 1 << 1,
            Argument::ResumptionToken => 1 << 2,
            Argument::From => 1 << 3,
            Argument::Until => 1 << 4,
            Argument::Set => 1 << 5,
        }
    }
}

/// A set of [`Argument`]s, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArgumentMask(u8);

impl ArgumentMask {
    pub const EMPTY: ArgumentMask = ArgumentMask(0);

    pub fn contains(&self, argument: Argument) -> bool {
        self.0 & argument.bit() != 0
    }
}

impl From<Argument> for ArgumentMask {
    fn from(argument: Argument) -> Self {
        ArgumentMask(argument.bit())
    }
}

impl BitOr for Argument {
    type Output = ArgumentMask;

    fn bitor(self, rhs: Argument) -> ArgumentMask {
        ArgumentMask(self.bit() | rhs.bit())
    }
}

impl BitOr<Argument> for ArgumentMask {
    type Output = ArgumentMask;

    fn bitor(self, rhs: Argument) -> ArgumentMask {
        ArgumentMask(self.0 | rhs.bit())
    }
}
