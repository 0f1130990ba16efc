//! XML building and parsing for the CDEK integration endpoints.
//!
//! The integration API speaks attribute-heavy XML documents posted as a
//! single form field. This module provides:
//!
//! - [`Element`]: an owned, ordered element tree assembled by the request
//!   builders and serialized with a single pass through `quick-xml`'s writer.
//! - [`XmlNode`]: an owned parse of a reply document (via `roxmltree`), with
//!   [`XmlNode::to_value`] flattening it into plain JSON data the way the
//!   carrier's schema expects (attributes become string fields, repeatable
//!   child tags group into arrays).
//!
//! Field names and nesting are dictated entirely by the carrier API; this
//! module encodes to that schema, it does not define it.

use std::collections::BTreeMap;
use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde_json::Value;
use thiserror::Error;

/// Child tags that repeat in reply documents and must group into arrays.
const ARRAY_TAGS: [&str; 6] = ["State", "Delay", "Good", "Fail", "Item", "Package"];

/// Errors that can occur while serializing or parsing XML documents.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The request tree could not be serialized.
    #[error("Failed to serialize XML request: {0}")]
    Write(#[from] quick_xml::Error),

    /// The reply document could not be parsed.
    #[error("Failed to parse XML response: {0}")]
    Parse(#[from] roxmltree::Error),

    /// The reply body is not valid UTF-8.
    #[error("XML response is not valid UTF-8")]
    InvalidUtf8,
}

/// An owned XML element with ordered attributes and children.
///
/// Attribute and child insertion order is preserved through serialization;
/// the carrier treats array position as significant.
///
/// # Example
///
/// ```rust
/// use cdek_api::xml::Element;
///
/// let mut order = Element::new("Order");
/// order.attr("Number", "12345");
/// order.opt_attr("Comment", None::<&str>); // skipped
///
/// let mut request = Element::new("DeliveryRequest");
/// request.child(order);
///
/// let xml = request.to_xml_string().unwrap();
/// assert!(xml.contains(r#"<Order Number="12345"/>"#));
/// assert!(!xml.contains("Comment"));
/// ```
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    /// Creates an empty element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the element tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Appends an attribute.
    pub fn attr(&mut self, name: impl Into<String>, value: impl ToString) {
        self.attributes.push((name.into(), value.to_string()));
    }

    /// Appends an attribute if the value is present, skips it otherwise.
    ///
    /// Absent values are omitted from the document entirely rather than
    /// serialized as empty strings.
    pub fn opt_attr(&mut self, name: impl Into<String>, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.attr(name, value);
        }
    }

    /// Appends a flag attribute serialized as `"1"` or `"0"`.
    pub fn flag_attr(&mut self, name: impl Into<String>, value: bool) {
        self.attr(name, u8::from(value));
    }

    /// Appends a child element.
    pub fn child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Returns the attribute value with the given name, if set.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the child elements in insertion order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Serializes the tree to a UTF-8 XML document string.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Write`] if the underlying writer fails.
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_into(&mut writer)?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|_| XmlError::InvalidUtf8)
    }

    fn write_into(&self, writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<(), quick_xml::Error> {
        let mut start = BytesStart::new(self.tag.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for child in &self.children {
                child.write_into(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(self.tag.as_str())))?;
        }
        Ok(())
    }
}

/// An owned node from a parsed reply document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    /// The element tag.
    pub tag: String,
    /// Element attributes.
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Returns the attribute value with the given name, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns whether the node carries the given attribute.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Returns the child elements with the given tag, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// Flattens the node into plain JSON data.
    ///
    /// Attributes become string fields. Child elements become nested
    /// objects keyed by tag, except tags the carrier repeats (`State`,
    /// `Delay`, `Good`, `Fail`, `Item`, `Package`), which group into arrays.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();

        for (name, value) in &self.attributes {
            map.insert(name.clone(), Value::String(value.clone()));
        }

        for child in &self.children {
            if ARRAY_TAGS.contains(&child.tag.as_str()) {
                let entry = map
                    .entry(child.tag.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Some(items) = entry.as_array_mut() {
                    items.push(child.to_value());
                }
            } else {
                map.insert(child.tag.clone(), child.to_value());
            }
        }

        Value::Object(map)
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        Self {
            tag: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect(),
            children: node
                .children()
                .filter(roxmltree::Node::is_element)
                .map(Self::from_node)
                .collect(),
        }
    }
}

/// Parses a reply document into an owned [`XmlNode`] tree.
///
/// # Errors
///
/// Returns [`XmlError::Parse`] if the text is not well-formed XML.
pub fn parse(text: &str) -> Result<XmlNode, XmlError> {
    let document = roxmltree::Document::parse(text)?;
    Ok(XmlNode::from_node(document.root_element()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_serializes_attributes_in_order() {
        let mut element = Element::new("Order");
        element.attr("Number", "100");
        element.attr("Phone", "+79999999999");

        let xml = element.to_xml_string().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"<Order Number="100" Phone="+79999999999"/>"#));
    }

    #[test]
    fn test_opt_attr_skips_none() {
        let mut element = Element::new("Order");
        element.opt_attr("Comment", None::<&str>);
        element.opt_attr("SellerName", Some("Shop"));

        let xml = element.to_xml_string().unwrap();
        assert!(!xml.contains("Comment"));
        assert!(xml.contains(r#"SellerName="Shop""#));
    }

    #[test]
    fn test_flag_attr_serializes_as_digit() {
        let mut element = Element::new("StatusReport");
        element.flag_attr("ShowHistory", true);
        element.flag_attr("Compact", false);

        let xml = element.to_xml_string().unwrap();
        assert!(xml.contains(r#"ShowHistory="1""#));
        assert!(xml.contains(r#"Compact="0""#));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let mut element = Element::new("Item");
        element.attr("Comment", r#"socks "wool" & more"#);

        let xml = element.to_xml_string().unwrap();
        assert!(xml.contains("&quot;wool&quot;"));
        assert!(xml.contains("&amp; more"));
    }

    #[test]
    fn test_nested_children_preserve_order() {
        let mut request = Element::new("DeliveryRequest");
        for number in ["1", "2", "3"] {
            let mut order = Element::new("Order");
            order.attr("Number", number);
            request.child(order);
        }

        let xml = request.to_xml_string().unwrap();
        let parsed = parse(&xml).unwrap();
        let numbers: Vec<_> = parsed
            .children_named("Order")
            .map(|order| order.attribute("Number").unwrap().to_string())
            .collect();
        assert_eq!(numbers, ["1", "2", "3"]);
    }

    #[test]
    fn test_parse_reads_attributes() {
        let node =
            parse(r#"<response><Order DispatchNumber="1105" Number="42"/></response>"#).unwrap();

        assert_eq!(node.tag, "response");
        let order = node.children_named("Order").next().unwrap();
        assert_eq!(order.attribute("DispatchNumber"), Some("1105"));
        assert!(order.has_attribute("Number"));
        assert!(!order.has_attribute("ErrorCode"));
    }

    #[test]
    fn test_to_value_groups_array_tags() {
        let node = parse(
            r#"<Order DispatchNumber="1">
                 <Status Code="1" Description="Created"/>
                 <State Code="1"/>
                 <State Code="2"/>
               </Order>"#,
        )
        .unwrap();

        let value = node.to_value();
        assert_eq!(value["DispatchNumber"], "1");
        assert_eq!(value["Status"]["Code"], "1");
        assert_eq!(value["State"].as_array().unwrap().len(), 2);
        assert_eq!(value["State"][1]["Code"], "2");
    }

    #[test]
    fn test_parse_rejects_malformed_document() {
        assert!(matches!(parse("<Order"), Err(XmlError::Parse(_))));
    }
}
