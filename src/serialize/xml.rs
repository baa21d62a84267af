//! Self-describing XML form
//!
//! Each field becomes an element named after the field; objects and lists
//! nest. Optional strings that are absent are written as `<Name Null="true"/>`,
//! lists carry a `Count` attribute. Strings holding characters XML 1.0 cannot
//! carry are stored as hex-encoded UTF-8 under `Encoding="hex"`. Written with
//! quick-xml, read back through a roxmltree document.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::ObjectReadWriter;
use crate::error::SchemaError;

/// Escape element text. Carriage returns become character references so
/// that script bodies with CRLF line endings survive XML end-of-line
/// normalization.
pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Characters allowed by the XML 1.0 `Char` production
fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&ch)
        || ('\u{E000}'..='\u{FFFD}').contains(&ch)
        || ch >= '\u{10000}'
}

/// Text of an element, undoing the hex encoding when it is marked
fn element_text(node: roxmltree::Node<'_, '_>) -> Result<String, SchemaError> {
    let text: String = node
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect();
    match node.attribute("Encoding") {
        None => Ok(text),
        Some("hex") => {
            let bytes = hex::decode(text.trim()).map_err(|e| {
                SchemaError::serialization(format!(
                    "invalid hex in <{}>: {}",
                    node.tag_name().name(),
                    e
                ))
            })?;
            String::from_utf8(bytes).map_err(|e| {
                SchemaError::serialization(format!(
                    "<{}> is not UTF-8: {}",
                    node.tag_name().name(),
                    e
                ))
            })
        }
        Some(other) => Err(SchemaError::serialization(format!(
            "unknown encoding '{}' on <{}>",
            other,
            node.tag_name().name()
        ))),
    }
}

/// Writer half of the XML form
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    open: Vec<String>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
            open: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    pub fn write_declaration(&mut self) -> Result<(), SchemaError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(())
    }

    /// Open an element carrying attributes, closed by [`ObjectReadWriter::end_object`]
    pub fn begin_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), SchemaError> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(start))?;
        self.open.push(name.to_string());
        Ok(())
    }

    fn write_text_element(&mut self, name: &str, text: &str) -> Result<(), SchemaError> {
        if text.is_empty() {
            self.writer.write_event(Event::Empty(BytesStart::new(name)))?;
            return Ok(());
        }
        if !text.chars().all(is_xml_char) {
            let start = BytesStart::new(name).with_attributes([("Encoding", "hex")]);
            self.writer.write_event(Event::Start(start))?;
            let encoded = hex::encode(text.as_bytes());
            self.writer
                .write_event(Event::Text(BytesText::from_escaped(encoded.as_str())))?;
            self.writer.write_event(Event::End(BytesEnd::new(name)))?;
            return Ok(());
        }
        let escaped = escape_text(text);
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(escaped.as_str())))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}

impl<W: Write> ObjectReadWriter for XmlWriter<W> {
    fn is_reading(&self) -> bool {
        false
    }

    fn read_write_u8(&mut self, name: &str, value: &mut u8) -> Result<(), SchemaError> {
        self.write_text_element(name, &value.to_string())
    }

    fn read_write_i32(&mut self, name: &str, value: &mut i32) -> Result<(), SchemaError> {
        self.write_text_element(name, &value.to_string())
    }

    fn read_write_i64(&mut self, name: &str, value: &mut i64) -> Result<(), SchemaError> {
        self.write_text_element(name, &value.to_string())
    }

    fn read_write_bool(&mut self, name: &str, value: &mut bool) -> Result<(), SchemaError> {
        self.write_text_element(name, if *value { "true" } else { "false" })
    }

    fn read_write_string(&mut self, name: &str, value: &mut String) -> Result<(), SchemaError> {
        self.write_text_element(name, value)
    }

    fn read_write_string_opt(
        &mut self,
        name: &str,
        value: &mut Option<String>,
    ) -> Result<(), SchemaError> {
        match value {
            Some(s) => self.write_text_element(name, s),
            None => {
                let start = BytesStart::new(name).with_attributes([("Null", "true")]);
                self.writer.write_event(Event::Empty(start))?;
                Ok(())
            }
        }
    }

    fn begin_object(&mut self, name: &str) -> Result<(), SchemaError> {
        self.begin_element(name, &[])
    }

    fn end_object(&mut self) -> Result<(), SchemaError> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| SchemaError::serialization("end_object without open element"))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn begin_list(&mut self, name: &str, len: usize) -> Result<usize, SchemaError> {
        let count = len.to_string();
        self.begin_element(name, &[("Count", count.as_str())])?;
        Ok(len)
    }

    fn end_list(&mut self) -> Result<(), SchemaError> {
        self.end_object()
    }
}

struct Frame<'a, 'input> {
    name: String,
    children: Vec<roxmltree::Node<'a, 'input>>,
    pos: usize,
}

impl<'a, 'input> Frame<'a, 'input> {
    fn over(node: roxmltree::Node<'a, 'input>) -> Self {
        let name = if node.is_element() {
            node.tag_name().name().to_string()
        } else {
            "(document)".to_string()
        };
        Self {
            name,
            children: node.children().filter(|c| c.is_element()).collect(),
            pos: 0,
        }
    }
}

/// Reader half of the XML form, walking a parsed document in field order
pub struct XmlReader<'a, 'input> {
    stack: Vec<Frame<'a, 'input>>,
}

impl<'a, 'input> XmlReader<'a, 'input> {
    /// Read the element children of `node` (a document root or an element)
    pub fn new(node: roxmltree::Node<'a, 'input>) -> Self {
        Self {
            stack: vec![Frame::over(node)],
        }
    }

    /// Fail if unread elements remain at the top level
    pub fn finish(&self) -> Result<(), SchemaError> {
        match self.stack.as_slice() {
            [frame] => check_exhausted(frame),
            _ => Err(SchemaError::serialization("unbalanced XML reader state")),
        }
    }

    fn next_element(&mut self, name: &str) -> Result<roxmltree::Node<'a, 'input>, SchemaError> {
        let frame = self
            .stack
            .last_mut()
            .ok_or_else(|| SchemaError::serialization("XML reader has no open element"))?;
        let node = frame.children.get(frame.pos).copied().ok_or_else(|| {
            SchemaError::serialization(format!(
                "expected <{}> inside <{}>, found end of element",
                name, frame.name
            ))
        })?;
        let found = node.tag_name().name();
        if found != name {
            return Err(SchemaError::serialization(format!(
                "expected <{}> inside <{}>, found <{}>",
                name, frame.name, found
            )));
        }
        frame.pos += 1;
        Ok(node)
    }

    fn next_text(&mut self, name: &str) -> Result<String, SchemaError> {
        let node = self.next_element(name)?;
        element_text(node)
    }

    fn next_parsed<T: std::str::FromStr>(&mut self, name: &str) -> Result<T, SchemaError> {
        let text = self.next_text(name)?;
        text.trim().parse().map_err(|_| {
            SchemaError::serialization(format!("invalid value '{}' for <{}>", text, name))
        })
    }
}

fn check_exhausted(frame: &Frame<'_, '_>) -> Result<(), SchemaError> {
    match frame.children.get(frame.pos) {
        Some(extra) => Err(SchemaError::serialization(format!(
            "unexpected element <{}> inside <{}>",
            extra.tag_name().name(),
            frame.name
        ))),
        None => Ok(()),
    }
}

impl ObjectReadWriter for XmlReader<'_, '_> {
    fn is_reading(&self) -> bool {
        true
    }

    fn read_write_u8(&mut self, name: &str, value: &mut u8) -> Result<(), SchemaError> {
        *value = self.next_parsed(name)?;
        Ok(())
    }

    fn read_write_i32(&mut self, name: &str, value: &mut i32) -> Result<(), SchemaError> {
        *value = self.next_parsed(name)?;
        Ok(())
    }

    fn read_write_i64(&mut self, name: &str, value: &mut i64) -> Result<(), SchemaError> {
        *value = self.next_parsed(name)?;
        Ok(())
    }

    fn read_write_bool(&mut self, name: &str, value: &mut bool) -> Result<(), SchemaError> {
        *value = self.next_parsed(name)?;
        Ok(())
    }

    fn read_write_string(&mut self, name: &str, value: &mut String) -> Result<(), SchemaError> {
        *value = self.next_text(name)?;
        Ok(())
    }

    fn read_write_string_opt(
        &mut self,
        name: &str,
        value: &mut Option<String>,
    ) -> Result<(), SchemaError> {
        let node = self.next_element(name)?;
        *value = if node.attribute("Null") == Some("true") {
            None
        } else {
            Some(element_text(node)?)
        };
        Ok(())
    }

    fn begin_object(&mut self, name: &str) -> Result<(), SchemaError> {
        let node = self.next_element(name)?;
        self.stack.push(Frame::over(node));
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), SchemaError> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| SchemaError::serialization("end_object without open element"))?;
        check_exhausted(&frame)
    }

    fn begin_list(&mut self, name: &str, _len: usize) -> Result<usize, SchemaError> {
        let node = self.next_element(name)?;
        let count: usize = node
            .attribute("Count")
            .and_then(|c| c.parse().ok())
            .ok_or_else(|| {
                SchemaError::serialization(format!("<{}> is missing a valid Count", name))
            })?;
        let frame = Frame::over(node);
        if frame.children.len() != count {
            return Err(SchemaError::serialization(format!(
                "<{}> declares {} items but contains {}",
                name,
                count,
                frame.children.len()
            )));
        }
        self.stack.push(frame);
        Ok(count)
    }

    fn end_list(&mut self) -> Result<(), SchemaError> {
        self.end_object()
    }
}
