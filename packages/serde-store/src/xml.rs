//! XML codec.
//!
//! XML has no arrays and no scalar types, so the mapping is lossy in a
//! predictable way:
//! - an element with child elements decodes to a map
//! - an element with only text decodes to a string
//! - repeated sibling elements decode to an array; a single one stays bare
//!
//! Callers that know which fields are multi-valued normalize the rest.

use bytes::Bytes;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use spdx_core_store::{Codec, Error, Format, Map, Value};

/// Encodes and decodes XML documents with a fixed root element.
///
/// A top-level array is written as a list root holding one root element per
/// item, and decoded back to an array.
#[derive(Debug, Clone, Copy)]
pub struct XmlCodec {
    root: &'static str,
    list_root: &'static str,
}

impl XmlCodec {
    pub const fn new(root: &'static str, list_root: &'static str) -> Self {
        Self { root, list_root }
    }

    /// `<Document>` root, `<Documents>` for several documents.
    pub const fn spdx_document() -> Self {
        Self::new("Document", "Documents")
    }
}

impl Default for XmlCodec {
    fn default() -> Self {
        Self::spdx_document()
    }
}

struct Frame {
    name: String,
    fields: Map,
    text: String,
    has_children: bool,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            fields: Map::new(),
            text: String::new(),
            has_children: false,
        }
    }

    /// Text between child elements is indentation and is dropped; text of a
    /// text-only element is kept exactly as read.
    fn into_value(self) -> Value {
        if self.has_children {
            Value::Map(self.fields)
        } else {
            Value::String(self.text)
        }
    }

    fn add_child(&mut self, name: String, value: Value) {
        self.has_children = true;
        match self.fields.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.fields.insert(name, value);
            }
        }
    }
}

fn element_name(start: &BytesStart<'_>) -> Result<String, String> {
    std::str::from_utf8(start.local_name().as_ref())
        .map(str::to_string)
        .map_err(|e| e.to_string())
}

/// Parse an XML document into its root element name and value.
fn parse(text: &str) -> Result<(String, Value), String> {
    let mut reader = Reader::from_str(text);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => stack.push(Frame::new(element_name(&start)?)),
            Event::Empty(start) => {
                let name = element_name(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.add_child(name, Value::String(String::new())),
                    None => root = Some((name, Value::String(String::new()))),
                }
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text.unescape().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| "unbalanced end tag".to_string())?;
                let name = frame.name.clone();
                let value = frame.into_value();
                match stack.last_mut() {
                    Some(parent) => parent.add_child(name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err("unexpected end of document".to_string());
    }
    root.ok_or_else(|| "document has no root element".to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), String> {
    match value {
        Value::Null => Ok(()),
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        Value::Map(map) if map.is_empty() => writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(|e| e.to_string()),
        Value::Map(map) => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(|e| e.to_string())?;
            for (field, child) in map {
                write_element(writer, field, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(|e| e.to_string())
        }
        scalar => {
            let text = scalar.as_text().unwrap_or_default();
            if text.is_empty() {
                return writer
                    .write_event(Event::Empty(BytesStart::new(name)))
                    .map_err(|e| e.to_string());
            }
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(|e| e.to_string())?;
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(|e| e.to_string())?;
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(|e| e.to_string())
        }
    }
}

impl Codec for XmlCodec {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(*format));
        }

        let text = std::str::from_utf8(bytes).map_err(|e| Error::decode(*format, e.to_string()))?;
        let (name, value) = parse(text).map_err(|message| Error::decode(*format, message))?;

        if name == self.list_root {
            return Ok(match value.get(self.root) {
                Some(Value::Array(items)) => Value::Array(items.clone()),
                Some(single) => Value::Array(vec![single.clone()]),
                None => Value::array(),
            });
        }
        Ok(value)
    }

    fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(*format));
        }

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| Error::encode(*format, e.to_string()))?;

        let written = match value {
            Value::Array(items) => {
                let mut list = Map::new();
                list.insert(self.root.to_string(), Value::Array(items.clone()));
                write_element(&mut writer, self.list_root, &Value::Map(list))
            }
            other => write_element(&mut writer, self.root, other),
        };
        written.map_err(|message| Error::encode(*format, message))?;

        Ok(Bytes::from(writer.into_inner()))
    }

    fn supports(&self, format: &Format) -> bool {
        format.is_xml()
    }
}
