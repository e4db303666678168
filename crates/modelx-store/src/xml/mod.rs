//! Minimal XML element tree
//!
//! Documents are small, so they are built and parsed as a whole. Only
//! elements and attributes are meaningful; text content is rejected.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use modelx_core::ExError;

use crate::errors::{illegal_char, parse_error, Result};

/// XML element with ordered attributes and children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder form of [`Element::set_attr`]
    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Set an attribute, replacing any previous value for `key`
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// # Errors
    /// * `Parse` - attribute missing
    pub fn require_attr(&self, key: &str) -> Result<&str> {
        self.attr(key).ok_or_else(|| {
            parse_error(format!(
                "<{}> is missing attribute '{}'",
                self.name, key
            ))
        })
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// # Errors
    /// * `Parse` - no child element with this name
    pub fn require_child(&self, name: &str) -> Result<&Element> {
        self.child(name)
            .ok_or_else(|| parse_error(format!("<{}> is missing <{}>", self.name, name)))
    }

    /// # Errors
    /// * `Parse` - element has another name
    pub fn expect_name(&self, name: &str) -> Result<&Self> {
        if self.name == name {
            Ok(self)
        } else {
            Err(parse_error(format!(
                "expected <{}>, found <{}>",
                name, self.name
            )))
        }
    }

    /// Children with the given name, every other child is an error
    ///
    /// # Errors
    /// * `Parse` - a child has another name
    pub fn children_named(&self, name: &str) -> Result<Vec<&Element>> {
        self.children.iter().map(|c| c.expect_name(name)).collect()
    }
}

/// Escape attribute text so that it reads back verbatim
///
/// Whitespace control characters are written as character references since
/// XML attribute normalisation would otherwise turn them into spaces. Other
/// C0 controls and U+FFFE/U+FFFF are refused: XML 1.0 has no way to carry
/// them, raw or referenced.
///
/// # Errors
/// * `InvalidInput` - `raw` contains a character XML 1.0 forbids
pub fn escape_attr(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if !is_xml_char(c) => return Err(illegal_char(c)),
            c => out.push(c),
        }
    }
    Ok(out)
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{fffd}' | '\u{10000}'..='\u{10ffff}'
    )
}

/// Render a document with an XML declaration
///
/// # Errors
/// * `InvalidInput` - an attribute value holds a character XML 1.0 forbids
/// * `Parse` - the writer rejected an event
pub fn render(root: &Element, indent: usize) -> Result<Vec<u8>> {
    let mut writer = if indent == 0 {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', indent)
    };

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| render_error("?xml", e))?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn render_error(name: &str, err: impl std::fmt::Display) -> ExError {
    parse_error(format!("cannot render <{}>: {}", name, err))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attrs {
        let escaped = escape_attr(value)
            .map_err(|e| e.with_op(format!("render <{}>", element.name)))?;
        // Tuple of raw bytes is written as-is; escaping is done above
        start.push_attribute((key.as_bytes(), escaped.as_bytes()));
    }

    if element.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| render_error(&element.name, e))?;
    } else {
        writer
            .write_event(Event::Start(start))
            .map_err(|e| render_error(&element.name, e))?;
        for child in &element.children {
            write_element(writer, child)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(element.name.as_str())))
            .map_err(|e| render_error(&element.name, e))?;
    }
    Ok(())
}

/// Parse a document into its root element
///
/// # Errors
/// * `Parse` - not UTF-8, malformed XML, text content, or not exactly one root
pub fn parse(bytes: &[u8]) -> Result<Element> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| parse_error(format!("document is not UTF-8: {}", e)))?;
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            parse_error(format!(
                "malformed XML at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(start) => stack.push(read_start(&start)?),
            Event::Empty(start) => {
                let element = read_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| parse_error("unbalanced end tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(_) | Event::CData(_) => {
                return Err(parse_error("unexpected text content"));
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(parse_error("unexpected end of document"));
    }
    root.ok_or_else(|| parse_error("document has no root element"))
}

fn read_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| parse_error(format!("element name is not UTF-8: {}", e)))?
        .to_string();

    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| parse_error(format!("bad attribute: {}", e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| parse_error(format!("attribute name is not UTF-8: {}", e)))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| parse_error(format!("bad value for attribute '{}': {}", key, e)))?
            .into_owned();
        element.attrs.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(parse_error("document has more than one root element")),
    }
    Ok(())
}
