//! Decoder implementations
//!
//! Each decoder turns a body into a `serde_json::Value` tree so the same
//! field-path resolution works for both formats.

use super::types::{BodyDecoder, BodyFormat};
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON body decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBodyDecoder;

impl JsonBodyDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self
    }
}

impl BodyDecoder for JsonBodyDecoder {
    fn format(&self) -> BodyFormat {
        BodyFormat::Json
    }

    fn decode_tree(&self, body: &[u8]) -> Result<Value> {
        serde_json::from_slice(body).map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
    }
}

// ============================================================================
// XML Decoder
// ============================================================================

/// XML body decoder
///
/// Produces a tree keyed by element local names:
/// - the document is `{ "<Root>": ... }`
/// - attributes become `@name` keys, namespace declarations are dropped
/// - repeated sibling elements become arrays
/// - text-only elements become strings, empty elements become `null`
/// - text mixed with child elements is kept under `#text`
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlBodyDecoder;

impl XmlBodyDecoder {
    /// Create a new XML decoder
    pub fn new() -> Self {
        Self
    }
}

impl BodyDecoder for XmlBodyDecoder {
    fn format(&self) -> BodyFormat {
        BodyFormat::Xml
    }

    fn decode_tree(&self, body: &[u8]) -> Result<Value> {
        xml_to_value(body)
    }
}

/// An element whose end tag has not been read yet
struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut children = Map::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::decode(format!("Invalid XML attribute: {e}")))?;
            if attr.key.as_ref().starts_with(b"xmlns") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::decode(format!("Invalid XML attribute value: {e}")))?;
            children.insert(format!("@{key}"), Value::String(value.into_owned()));
        }

        Ok(Self {
            name,
            children,
            text: String::new(),
        })
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(arr)) => arr.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.children.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        } else {
            let mut children = self.children;
            if !text.is_empty() {
                children.insert("#text".to_string(), Value::String(text.to_string()));
            }
            Value::Object(children)
        };
        (self.name, value)
    }
}

/// Parse an XML document into a JSON value tree
pub fn xml_to_value(body: &[u8]) -> Result<Value> {
    let mut reader = Reader::from_reader(body);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            Error::decode(format!(
                "Invalid XML at position {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(ref e) => stack.push(Frame::open(e)?),
            Event::Empty(ref e) => {
                let (name, value) = Frame::open(e)?.close();
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::decode("Unexpected closing tag"))?;
                let (name, value) = frame.close();
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::decode(format!("Invalid XML text: {e}")))?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::decode(format!(
            "Unexpected end of XML inside <{}>",
            open.name
        )));
    }

    let (name, value) = root.ok_or_else(|| Error::decode("XML body has no root element"))?;
    let mut doc = Map::new();
    doc.insert(name, value);
    Ok(Value::Object(doc))
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, Value)>,
    name: String,
    value: Value,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.add_child(name, value);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::decode("XML body has more than one root element"));
    }
    *root = Some((name, value));
    Ok(())
}
