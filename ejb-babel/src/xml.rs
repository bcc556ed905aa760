//! Small XML document tree
//!
//!     Manifests are parsed into [`Element`] trees, and XML destinations are built as trees and
//!     serialized in one go. Besides ordinary (escaped) text, a node can be a [`Node::Literal`]:
//!     a block written verbatim as a CDATA section, used for raw HTML and source code. Only
//!     literal nodes bypass escaping; attribute values and ordinary text are always escaped.
//!
//!     A `]]>` inside a literal would end the section early, so the block is split into two
//!     sections around it. The concatenated character data is unchanged.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(String),
    #[error("document has no root element")]
    EmptyDocument,
    #[error("unexpected closing tag </{0}>")]
    UnexpectedEnd(String),
    #[error("failed to write XML: {0}")]
    Write(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Escaped on output.
    Text(String),
    /// Written verbatim as CDATA.
    Literal(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Shorthand for `<name>text</name>`.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).text(text)
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn literal(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Literal(text.into()));
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First child element called `name`.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Follow a `/` separated path of child names, e.g. `judging/testset`.
    pub fn find_path(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .try_fold(self, |element, name| element.find(name))
    }

    /// Concatenated text and literal content of the direct children.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) | Node::Literal(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

/// Parse a document and return its root element.
pub fn parse(source: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(start_element(&e)?),
            Ok(Event::Empty(e)) => {
                let element = start_element(&e)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(e)) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlError::UnexpectedEnd(String::from_utf8_lossy(e.name().as_ref()).to_string())
                })?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| XmlError::Syntax(err.to_string()))?;
                if let Some(parent) = stack.last_mut() {
                    parent.push(Node::Text(text.into_owned()));
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).to_string();
                if let Some(parent) = stack.last_mut() {
                    parent.push(Node::Literal(text));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(XmlError::Syntax(err.to_string())),
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Syntax(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or(XmlError::EmptyDocument)
}

fn start_element(e: &BytesStart<'_>) -> Result<Element, XmlError> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()).to_string());
    for attr in e.attributes() {
        let attr = attr.map_err(|err| XmlError::Syntax(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Syntax(err.to_string()))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Serialize with an XML declaration and two-space indentation.
pub fn to_string(root: &Element) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    write_element(&mut writer, root)?;
    String::from_utf8(writer.into_inner()).map_err(|err| XmlError::Write(err.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for node in &element.children {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_error)?,
            Node::Literal(text) => {
                for section in cdata_sections(text) {
                    writer
                        .write_event(Event::CData(BytesCData::new(section)))
                        .map_err(write_error)?;
                }
            }
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_error)
}

/// Split literal content so that no section contains `]]>`.
fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        // keep "]]" in this section, start the next one at ">"
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}

fn write_error(err: impl std::fmt::Display) -> XmlError {
    XmlError::Write(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_not_escaped() {
        let root = Element::new("text").literal("<p>a & b</p>");
        let xml = to_string(&root).unwrap();
        assert!(xml.contains("<text><![CDATA[<p>a & b</p>]]></text>"), "{xml}");
    }

    #[test]
    fn test_text_and_attributes_are_escaped() {
        let root = Element::new("name").attr("note", "a\"b").text("x < y & z");
        let xml = to_string(&root).unwrap();
        assert!(xml.contains("x &lt; y &amp; z"), "{xml}");
        assert!(xml.contains("note=\"a&quot;b\""), "{xml}");
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let root = Element::new("answer").literal("a[b[0]]>c");
        let xml = to_string(&root).unwrap();
        assert!(xml.contains("<![CDATA[a[b[0]]]]><![CDATA[>c]]>"), "{xml}");

        let parsed = parse(&xml).unwrap();
        assert_eq!(parsed.text_content(), "a[b[0]]>c");
    }

    #[test]
    fn test_cdata_sections() {
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections("]]>"), vec!["]]", ">"]);
        assert_eq!(cdata_sections("x]]>]]>y"), vec!["x]]", ">]]", ">y"]);
    }

    #[test]
    fn test_parse_and_navigate() {
        let source = r#"<?xml version="1.0"?>
            <problem short-name="sum">
              <judging><testset>
                <time-limit>2000</time-limit>
                <tests><test method="manual" sample="true"/><test method="manual"/></tests>
              </testset></judging>
            </problem>"#;
        let root = parse(source).unwrap();
        assert_eq!(root.attribute("short-name"), Some("sum"));
        let testset = root.find_path("judging/testset").unwrap();
        assert_eq!(testset.find("time-limit").unwrap().text_content(), "2000");
        let samples: Vec<bool> = testset
            .find("tests")
            .unwrap()
            .find_all("test")
            .map(|t| t.attribute("sample").is_some())
            .collect();
        assert_eq!(samples, vec![true, false]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse(""), Err(XmlError::EmptyDocument)));
        assert!(parse("<a><b></a>").is_err());
    }
}
