//! Minimal namespaced XML tree and its serializer.
//!
//! Every [`Element`] is built with its namespace already attached, so there
//! is no post-processing pass to push the protocol namespace down the tree.
//! When rendering, an element declares `xmlns` only if its namespace differs
//! from the one in scope, which keeps nested payloads in the default
//! namespace however deep they are.

use crate::error::{ProviderError, ProviderResult};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// Namespace of all OAI-PMH protocol elements.
pub const OAI_NAMESPACE: &str = "http://www.openarchives.org/OAI/2.0/";

/// Content of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data, escaped on output
    Text(String),
    /// A pre-rendered XML fragment written verbatim
    Raw(String),
}

/// An XML element bound to a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an element in the OAI-PMH namespace.
    pub fn oai(name: impl Into<String>) -> Self {
        Self::in_namespace(OAI_NAMESPACE, name)
    }

    /// Create an element in an explicit namespace.
    pub fn in_namespace(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First direct child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|element| element.name == name)
    }

    /// Concatenated text content of the element's direct children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) | Node::Raw(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_raw(mut self, fragment: impl Into<String>) -> Self {
        self.children.push(Node::Raw(fragment.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Serialize as a document with an XML declaration.
    pub fn to_document(&self, indent: bool) -> ProviderResult<String> {
        let mut writer = if indent {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            Writer::new(Vec::new())
        };
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| ProviderError::rendering(e.to_string()))?;
        self.write(&mut writer, None)?;
        String::from_utf8(writer.into_inner()).map_err(|e| ProviderError::rendering(e.to_string()))
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>, in_scope: Option<&str>) -> ProviderResult<()> {
        let mut start = BytesStart::new(self.name.as_str());
        if in_scope != Some(self.namespace.as_str()) {
            start.push_attribute(("xmlns", self.namespace.as_str()));
        }
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(|e| ProviderError::rendering(e.to_string()));
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| ProviderError::rendering(e.to_string()))?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write(writer, Some(self.namespace.as_str()))?,
                Node::Text(text) => writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(|e| ProviderError::rendering(e.to_string()))?,
                Node::Raw(fragment) => writer
                    .write_event(Event::Text(BytesText::from_escaped(fragment.as_str())))
                    .map_err(|e| ProviderError::rendering(e.to_string()))?,
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| ProviderError::rendering(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_declared_once() {
        let tree = Element::oai("root")
            .with_child(Element::oai("a").with_child(Element::oai("b").with_text("x")));
        let xml = tree.to_document(false).unwrap();
        assert_eq!(
            xml,
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?><root xmlns=\"{}\"><a><b>x</b></a></root>",
                OAI_NAMESPACE
            )
        );
    }

    #[test]
    fn test_foreign_namespace_redeclared() {
        let tree = Element::oai("root").with_child(
            Element::in_namespace("urn:other", "foreign").with_child(Element::oai("back")),
        );
        let xml = tree.to_document(false).unwrap();
        assert!(xml.contains("<foreign xmlns=\"urn:other\">"));
        assert!(xml.contains(&format!("<back xmlns=\"{}\"/>", OAI_NAMESPACE)));
    }

    #[test]
    fn test_text_escaped_raw_verbatim() {
        let tree = Element::oai("root")
            .with_child(Element::oai("t").with_text("a < b & c"))
            .with_child(Element::oai("m").with_raw("<dc:title>T</dc:title>"));
        let xml = tree.to_document(false).unwrap();
        assert!(xml.contains("<t>a &lt; b &amp; c</t>"));
        assert!(xml.contains("<m><dc:title>T</dc:title></m>"));
    }

    #[test]
    fn test_attribute_escaped() {
        let tree = Element::oai("root").with_attribute("q", "a&b");
        let xml = tree.to_document(false).unwrap();
        assert!(xml.contains("q=\"a&amp;b\""));
    }

    #[test]
    fn test_accessors() {
        let tree = Element::oai("root")
            .with_attribute("k", "v")
            .with_child(Element::oai("child").with_text("hello"));
        assert_eq!(tree.attribute("k"), Some("v"));
        assert_eq!(tree.child("child").unwrap().text(), "hello");
        assert_eq!(tree.child_elements().count(), 1);
        assert!(tree.child("missing").is_none());
    }
}
