//! Response document construction.
//!
//! Every response shares one envelope:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/" xmlns:xsi="..." xsi:schemaLocation="...">
//!   <responseDate>...</responseDate>
//!   <request verb="..." ...>base URL</request>
//!   <!-- exactly one verb payload element or one error element -->
//! </OAI-PMH>
//! ```
//!
//! The fragment builders below produce the verb payloads. Optional text
//! fields that are blank are left out rather than rendered empty.

use crate::config::ProviderConfig;
use crate::datestamp::Granularity;
use crate::error::{OaiError, ProviderResult};
use crate::model::{MetadataFormat, Record, RecordContainer, RecordHeader};
use crate::request::{ArgumentSet, Verb};
use crate::xml::{Element, OAI_NAMESPACE};
use chrono::{DateTime, Utc};

pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const OAI_SCHEMA_LOCATION: &str =
    "http://www.openarchives.org/OAI/2.0/ http://www.openarchives.org/OAI/2.0/OAI-PMH.xsd";

/// The echoed request: supplied arguments as attributes, base URL as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEcho {
    base_url: String,
    attributes: Vec<(&'static str, String)>,
}

impl RequestEcho {
    pub fn new(base_url: impl Into<String>, arguments: &ArgumentSet) -> Self {
        Self {
            base_url: base_url.into(),
            attributes: arguments
                .supplied()
                .into_iter()
                .map(|(name, value)| (name, value.to_string()))
                .collect(),
        }
    }

    pub fn to_element(&self) -> Element {
        self.attributes
            .iter()
            .fold(Element::oai("request"), |element, (name, value)| {
                element.with_attribute(*name, value.clone())
            })
            .with_text(self.base_url.clone())
    }
}

/// What follows the request echo: a verb payload or a single error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Payload(Element),
    Error(OaiError),
}

/// Assemble the full document tree.
pub fn build_document(response_date: &str, request: &RequestEcho, body: &ResponseBody) -> Element {
    let content = match body {
        ResponseBody::Payload(payload) => payload.clone(),
        ResponseBody::Error(error) => error_element(error),
    };

    Element::oai("OAI-PMH")
        .with_attribute("xmlns:xsi", XSI_NAMESPACE)
        .with_attribute("xsi:schemaLocation", OAI_SCHEMA_LOCATION)
        .with_child(Element::oai("responseDate").with_text(response_date))
        .with_child(request.to_element())
        .with_child(content)
}

/// `<error code="...">message</error>`
pub fn error_element(error: &OaiError) -> Element {
    Element::oai("error")
        .with_attribute("code", error.code())
        .with_text(error.to_string())
}

/// A text element, or `None` when the value is blank.
pub fn text_element(name: &str, value: &str) -> Option<Element> {
    if value.trim().is_empty() {
        None
    } else {
        Some(Element::oai(name).with_text(value))
    }
}

fn push_text(parent: &mut Element, name: &str, value: &str) {
    if let Some(child) = text_element(name, value) {
        parent.push_child(child);
    }
}

/// `<header>` with identifier, datestamp and set memberships.
pub fn header_element(header: &RecordHeader, granularity: Granularity) -> Element {
    let mut element = Element::oai("header");
    if let Some(status) = header.status {
        element = element.with_attribute("status", status.as_str());
    }
    push_text(&mut element, "identifier", &header.identifier);
    push_text(&mut element, "datestamp", &granularity.encode(&header.datestamp));
    for set_spec in &header.set_specs {
        push_text(&mut element, "setSpec", set_spec);
    }
    element
}

/// `<record>` with its header and, unless deleted, its metadata.
pub fn record_element(record: &Record, granularity: Granularity) -> Element {
    let mut element = Element::oai("record").with_child(header_element(&record.header, granularity));
    if !record.header.is_deleted() {
        if let Some(metadata) = &record.metadata {
            element.push_child(Element::oai("metadata").with_raw(metadata.content.clone()));
        }
    }
    element
}

/// `<metadataFormat>` descriptor.
pub fn metadata_format_element(format: &MetadataFormat) -> Element {
    let mut element = Element::oai("metadataFormat");
    push_text(&mut element, "metadataPrefix", &format.metadata_prefix);
    push_text(&mut element, "schema", &format.schema);
    push_text(&mut element, "metadataNamespace", &format.metadata_namespace);
    element
}

/// `<resumptionToken>` for a page of a list response.
///
/// A page with a continuation carries the encoded token; the last page of a
/// multi-page list carries an empty element. A single-page list gets none.
pub fn resumption_token_element(container: &RecordContainer) -> Option<Element> {
    if !container.is_paginated() {
        return None;
    }

    let mut element = Element::oai("resumptionToken");
    if let Some(token) = &container.resumption_token {
        element = element.with_attribute(
            "expirationDate",
            Granularity::Seconds.encode(&token.expiration),
        );
    }
    if let Some(size) = container.complete_list_size {
        element = element.with_attribute("completeListSize", size.to_string());
    }
    element = element.with_attribute("cursor", container.cursor.to_string());
    if let Some(token) = &container.resumption_token {
        element = element.with_text(token.encode());
    }
    Some(element)
}

/// `<Identify>` payload from configuration, in schema order.
pub fn identify_element(config: &ProviderConfig) -> Element {
    let mut element = Element::oai("Identify");
    push_text(&mut element, "repositoryName", &config.repository_name);
    push_text(&mut element, "baseURL", &config.base_url);
    push_text(&mut element, "protocolVersion", &config.protocol_version);
    for email in &config.admin_emails {
        push_text(&mut element, "adminEmail", email);
    }
    push_text(
        &mut element,
        "earliestDatestamp",
        &config.granularity.encode(&config.earliest_datestamp),
    );
    push_text(&mut element, "deletedRecord", config.deleted_record_policy.as_str());
    push_text(&mut element, "granularity", config.granularity.as_str());
    for compression in &config.compressions {
        push_text(&mut element, "compression", compression);
    }
    for description in &config.descriptions {
        if !description.trim().is_empty() {
            element.push_child(Element::oai("description").with_raw(description.clone()));
        }
    }
    element
}

/// A complete response: the document tree plus its disposition.
#[derive(Debug, Clone, PartialEq)]
pub struct OaiResponse {
    verb: Verb,
    response_date: DateTime<Utc>,
    error: Option<OaiError>,
    document: Element,
}

impl OaiResponse {
    pub(crate) fn new(
        verb: Verb,
        response_date: DateTime<Utc>,
        error: Option<OaiError>,
        document: Element,
    ) -> Self {
        Self {
            verb,
            response_date,
            error,
            document,
        }
    }

    /// The verb the request was classified as.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn response_date(&self) -> DateTime<Utc> {
        self.response_date
    }

    /// The protocol error, when the response is an error response.
    pub fn error(&self) -> Option<&OaiError> {
        self.error.as_ref()
    }

    /// The protocol error code, when the response is an error response.
    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(OaiError::code)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The root `OAI-PMH` element.
    pub fn document(&self) -> &Element {
        &self.document
    }

    /// The verb payload element, absent for error responses.
    pub fn payload(&self) -> Option<&Element> {
        if self.is_error() {
            return None;
        }
        self.verb.name().and_then(|name| self.document.child(name))
    }

    /// Serialize the document compactly.
    pub fn to_xml(&self) -> ProviderResult<String> {
        self.document.to_document(false)
    }

    /// Serialize the document with two-space indentation.
    pub fn to_xml_pretty(&self) -> ProviderResult<String> {
        self.document.to_document(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordMetadata, RecordStatus};
    use crate::resumption::ResumptionToken;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 5, 6, 7, 8, 9).unwrap()
    }

    #[test]
    fn test_envelope() {
        let arguments = ArgumentSet::new("Identify");
        let echo = RequestEcho::new("http://x/oai", &arguments);
        let document = build_document(
            "2020-05-06T07:08:09Z",
            &echo,
            &ResponseBody::Error(OaiError::BadVerb),
        );

        assert_eq!(document.name(), "OAI-PMH");
        assert_eq!(document.namespace(), OAI_NAMESPACE);
        assert_eq!(document.attribute("xsi:schemaLocation"), Some(OAI_SCHEMA_LOCATION));
        let names: Vec<&str> = document.child_elements().map(Element::name).collect();
        assert_eq!(names, vec!["responseDate", "request", "error"]);

        let request = document.child("request").unwrap();
        assert_eq!(request.attribute("verb"), Some("Identify"));
        assert_eq!(request.text(), "http://x/oai");
        assert_eq!(document.child("error").unwrap().attribute("code"), Some("badVerb"));
    }

    #[test]
    fn test_header_omits_blank_fields() {
        let header = RecordHeader::new("oai:x:1", stamp()).with_set("").with_set("math");
        let element = header_element(&header, Granularity::Day);
        let names: Vec<&str> = element.child_elements().map(Element::name).collect();
        assert_eq!(names, vec!["identifier", "datestamp", "setSpec"]);
        assert_eq!(element.child("datestamp").unwrap().text(), "2020-05-06");
        assert!(element.attribute("status").is_none());
    }

    #[test]
    fn test_deleted_record_renders_header_only() {
        let mut header = RecordHeader::new("oai:x:2", stamp());
        header.status = Some(RecordStatus::Deleted);
        let record = Record::new(header, Some(RecordMetadata::new("oai_dc", "<dc/>")));
        let element = record_element(&record, Granularity::Seconds);

        assert!(element.child("metadata").is_none());
        assert_eq!(
            element.child("header").unwrap().attribute("status"),
            Some("deleted")
        );
    }

    #[test]
    fn test_metadata_format_omits_blank_schema() {
        let format = MetadataFormat::new("raw", "", "urn:raw");
        let element = metadata_format_element(&format);
        assert!(element.child("schema").is_none());
        assert_eq!(element.child("metadataNamespace").unwrap().text(), "urn:raw");
    }

    #[test]
    fn test_resumption_token_element() {
        let single = RecordContainer::default();
        assert!(resumption_token_element(&single).is_none());

        let token = ResumptionToken {
            metadata_prefix: "oai_dc".to_string(),
            from: None,
            until: None,
            set: None,
            expiration: stamp(),
            cursor: 10,
        };
        let first = RecordContainer {
            records: Vec::new(),
            resumption_token: Some(token.clone()),
            complete_list_size: Some(25),
            cursor: 0,
        };
        let element = resumption_token_element(&first).unwrap();
        assert_eq!(element.text(), token.encode());
        assert_eq!(element.attribute("expirationDate"), Some("2020-05-06T07:08:09Z"));
        assert_eq!(element.attribute("completeListSize"), Some("25"));
        assert_eq!(element.attribute("cursor"), Some("0"));

        let last = RecordContainer {
            records: Vec::new(),
            resumption_token: None,
            complete_list_size: Some(25),
            cursor: 20,
        };
        let element = resumption_token_element(&last).unwrap();
        assert!(element.text().is_empty());
        assert_eq!(element.attribute("cursor"), Some("20"));
    }

    #[test]
    fn test_identify_order_and_omission() {
        let config = ProviderConfig {
            repository_name: "Sample".to_string(),
            base_url: "http://x/oai".to_string(),
            compressions: vec!["gzip".to_string()],
            descriptions: vec!["".to_string()],
            ..ProviderConfig::default()
        };
        let element = identify_element(&config);
        let names: Vec<&str> = element.child_elements().map(Element::name).collect();
        assert_eq!(
            names,
            vec![
                "repositoryName",
                "baseURL",
                "protocolVersion",
                "earliestDatestamp",
                "deletedRecord",
                "granularity",
                "compression"
            ]
        );
    }
}
