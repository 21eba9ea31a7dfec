//! Datestamps at the two protocol granularities.
//!
//! OAI-PMH exchanges UTC datestamps either as a day (`YYYY-MM-DD`) or to the
//! second (`YYYY-MM-DDThh:mm:ssZ`). A repository commits to one granularity
//! in its configuration; harvesters may always use the coarser one.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const DAY_FORMAT: &str = "%Y-%m-%d";
const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Timestamp granularity supported by a repository.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Granularity {
    /// `YYYY-MM-DD`
    #[serde(rename = "YYYY-MM-DD")]
    Day,
    /// `YYYY-MM-DDThh:mm:ssZ`
    #[default]
    #[serde(rename = "YYYY-MM-DDThh:mm:ssZ")]
    Seconds,
}

impl Granularity {
    /// The pattern string advertised in the `Identify` response.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "YYYY-MM-DD",
            Granularity::Seconds => "YYYY-MM-DDThh:mm:ssZ",
        }
    }

    /// Encode an instant at this granularity.
    pub fn encode(&self, value: &DateTime<Utc>) -> String {
        match self {
            Granularity::Day => value.format(DAY_FORMAT).to_string(),
            Granularity::Seconds => value.format(SECONDS_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded datestamp together with the granularity it was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datestamp {
    value: DateTime<Utc>,
    granularity: Granularity,
}

impl Datestamp {
    /// Parse one of the two protocol forms. Anything else yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.len() {
            10 if has_date_shape(text) => {
                let date = NaiveDate::parse_from_str(text, DAY_FORMAT).ok()?;
                Some(Self {
                    value: Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?),
                    granularity: Granularity::Day,
                })
            }
            20 if has_date_shape(text) && text.as_bytes()[10] == b'T' && text.ends_with('Z') => {
                let value = NaiveDateTime::parse_from_str(text, SECONDS_FORMAT).ok()?;
                Some(Self {
                    value: Utc.from_utc_datetime(&value),
                    granularity: Granularity::Seconds,
                })
            }
            _ => None,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Earliest instant covered by this datestamp.
    pub fn lower_bound(&self) -> DateTime<Utc> {
        self.value
    }

    /// Latest instant covered by this datestamp.
    ///
    /// A datestamp covers its whole unit: a day up to its last second, a
    /// second up to its last nanosecond. Records stamped with sub-second
    /// precision therefore match the datestamp they are rendered with.
    pub fn upper_bound(&self) -> DateTime<Utc> {
        let unit = match self.granularity {
            Granularity::Day => chrono::Duration::days(1),
            Granularity::Seconds => chrono::Duration::seconds(1),
        };
        self.value + unit - chrono::Duration::nanoseconds(1)
    }
}

impl fmt::Display for Datestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.granularity.encode(&self.value))
    }
}

fn has_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

/// Converts between instants and protocol datestamp strings.
///
/// The dispatcher only talks to dates through this trait, so a deployment
/// can swap in its own rules (for example a local clock source in tests).
pub trait DateConverter: Send + Sync {
    /// Encode an instant at the given granularity.
    fn encode(&self, granularity: Granularity, value: &DateTime<Utc>) -> String;

    /// Decode a datestamp string, or `None` when it is not a legal datestamp.
    fn try_decode(&self, text: &str) -> Option<Datestamp>;

    /// The current instant, used for response dates and token expiry.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Default converter using the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcDateConverter;

impl DateConverter for UtcDateConverter {
    fn encode(&self, granularity: Granularity, value: &DateTime<Utc>) -> String {
        granularity.encode(value)
    }

    fn try_decode(&self, text: &str) -> Option<Datestamp> {
        Datestamp::parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day() {
        let stamp = Datestamp::parse("2020-02-29").unwrap();
        assert_eq!(stamp.granularity(), Granularity::Day);
        assert_eq!(stamp.to_string(), "2020-02-29");
        assert_eq!(
            Granularity::Seconds.encode(&stamp.upper_bound()),
            "2020-02-29T23:59:59Z"
        );
    }

    #[test]
    fn test_parse_seconds() {
        let stamp = Datestamp::parse("2021-06-01T12:30:05Z").unwrap();
        assert_eq!(stamp.granularity(), Granularity::Seconds);
        assert_eq!(
            Granularity::Seconds.encode(&stamp.upper_bound()),
            "2021-06-01T12:30:05Z"
        );
        let within = stamp.lower_bound() + chrono::Duration::milliseconds(500);
        assert!(within < stamp.upper_bound());
        assert!(stamp.upper_bound() < stamp.lower_bound() + chrono::Duration::seconds(1));
        assert_eq!(stamp.to_string(), "2021-06-01T12:30:05Z");
    }

    #[test]
    fn test_rejects_malformed() {
        for text in [
            "",
            "2020",
            "2020-1-01",
            "2020-13-01",
            "2020-02-30",
            "2020-01-01T10:00:00",
            "2020-01-01T10:00Z",
            "2020-01-01 10:00:00Z",
            "yesterday",
        ] {
            assert!(Datestamp::parse(text).is_none(), "accepted {:?}", text);
        }
    }

    #[test]
    fn test_encode_granularity() {
        let value = Utc.with_ymd_and_hms(2019, 3, 4, 5, 6, 7).unwrap();
        let converter = UtcDateConverter;
        assert_eq!(converter.encode(Granularity::Day, &value), "2019-03-04");
        assert_eq!(
            converter.encode(Granularity::Seconds, &value),
            "2019-03-04T05:06:07Z"
        );
    }

    #[test]
    fn test_granularity_serde_uses_protocol_pattern() {
        let json = serde_json::to_string(&Granularity::Day).unwrap();
        assert_eq!(json, "\"YYYY-MM-DD\"");
        let parsed: Granularity = serde_json::from_str("\"YYYY-MM-DDThh:mm:ssZ\"").unwrap();
        assert_eq!(parsed, Granularity::Seconds);
    }
}
