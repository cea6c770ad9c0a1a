//! Minimal XML element tree built on quick-xml
//!
//! Result files are small, so the whole document is materialized before it is
//! interpreted. Only element names, attributes, children and the leading text
//! of each element are kept.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// An XML element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Text before the first child element, if any
    pub text: Option<String>,
}

impl Element {
    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over the direct children with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            tag: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
            text: None,
        })
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() || !self.children.is_empty() {
            return;
        }
        self.text.get_or_insert_with(String::new).push_str(text);
    }
}

/// Parse the file at `path` and return its root element.
pub fn parse_file(path: &Path) -> Result<Element> {
    let contents = fs::read_to_string(path)?;
    parse_str(contents.strip_prefix('\u{feff}').unwrap_or(&contents))
}

/// Parse a document and return its root element.
pub fn parse_str(contents: &str) -> Result<Element> {
    let mut reader = Reader::from_str(contents);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(junk_after_root(&reader));
                }
                stack.push(Element::from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                attach(&mut stack, &mut root, element, &reader)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::MalformedXml("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element, &reader)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                match stack.last_mut() {
                    Some(current) => current.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(Error::MalformedXml(format!(
                            "text outside of the root element at position {}",
                            reader.buffer_position()
                        )))
                    }
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::MalformedXml(format!(
            "unclosed element '{}'",
            open.tag
        )));
    }
    root.ok_or_else(|| Error::MalformedXml("no element found".to_string()))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    reader: &Reader<&[u8]>,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(junk_after_root(reader)),
    }
    Ok(())
}

fn junk_after_root(reader: &Reader<&[u8]>) -> Error {
    Error::MalformedXml(format!(
        "junk after document element at position {}",
        reader.buffer_position()
    ))
}
