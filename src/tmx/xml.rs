/*!
 * Minimal owned XML tree for round-trip TMX handling.
 *
 * quick-xml provides the tokenizer; this module builds a small element tree
 * from its events and prints it back. Text, CDATA, comments and processing
 * instructions are all kept as nodes so untouched records are reproduced
 * faithfully.
 */

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::TmxError;

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Tag name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute in place, or append it when absent.
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(name, _)| name == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Direct children with the given local name.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.child_elements()
            .filter(move |element| element.local_name() == local)
    }

    pub fn child(&self, local: &str) -> Option<&Element> {
        self.child_elements().find(|element| element.local_name() == local)
    }

    pub fn child_mut(&mut self, local: &str) -> Option<&mut Element> {
        self.find_child_mut(|element| element.local_name() == local)
    }

    /// First direct child element matching `predicate`.
    pub fn find_child_mut<F>(&mut self, predicate: F) -> Option<&mut Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if predicate(element) => Some(element),
            _ => None,
        })
    }

    pub fn push_element(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// All descendants (excluding self) with the given local name, in document order.
    pub fn descendants_named<'a>(&'a self, local: &str, found: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.local_name() == local {
                found.push(child);
            }
            child.descendants_named(local, found);
        }
    }

    /// Concatenated character data of the subtree, including text that trails
    /// inline children. Comments and processing instructions are skipped.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, text: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(value) | Node::CData(value) => text.push_str(value),
                Node::Element(element) => element.collect_text(text),
                Node::Comment(_) | Node::ProcessingInstruction(_) => {}
            }
        }
    }

    /// Replace all content with a single plain text node.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    // Indenting is only safe where whitespace carries no meaning: never inside
    // a segment and never where real character data sits between children.
    fn is_indentable(&self) -> bool {
        if self.local_name() == "seg" {
            return false;
        }
        let mut has_element = false;
        for node in &self.children {
            match node {
                Node::Text(value) if value.trim().is_empty() => {}
                Node::Text(_) | Node::CData(_) => return false,
                Node::Element(_) => has_element = true,
                Node::Comment(_) | Node::ProcessingInstruction(_) => {}
            }
        }
        has_element
    }
}

fn malformed(position: u64, message: impl Into<String>) -> TmxError {
    TmxError::MalformedInput {
        position,
        message: message.into(),
    }
}

fn decode_utf8(bytes: &[u8], position: u64) -> Result<String, TmxError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| malformed(position, format!("invalid UTF-8: {}", e)))
}

fn element_from_start(start: &BytesStart<'_>, position: u64) -> Result<Element, TmxError> {
    let name = decode_utf8(start.name().as_ref(), position)?;
    let mut element = Element::new(&name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| malformed(position, e.to_string()))?;
        let key = decode_utf8(attribute.key.as_ref(), position)?;
        let value = attribute
            .unescape_value()
            .map_err(|e| malformed(position, e.to_string()))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: u64,
) -> Result<(), TmxError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push_element(element);
            Ok(())
        }
        None if root.is_some() => Err(malformed(position, "multiple root elements")),
        None => {
            *root = Some(element);
            Ok(())
        }
    }
}

fn push_node(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

/// Encoding named in the XML declaration, if it is ASCII-compatible.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = bytes.strip_prefix(b"<?xml")?;
    let end = head.iter().position(|&byte| byte == b'>')?;
    let declaration = std::str::from_utf8(&head[..end]).ok()?;

    let rest = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = rest[1..].split(quote).next()?;

    Encoding::for_label(label.trim().as_bytes()).filter(|encoding| encoding.is_ascii_compatible())
}

/// Transcode raw input to UTF-8.
///
/// The byte order mark wins, then a BOM-less UTF-16 declaration start, then
/// the `encoding` pseudo-attribute of the declaration; UTF-8 otherwise.
/// Error positions of UTF-8 input are byte offsets into the input.
fn decode_input(bytes: &[u8]) -> Result<Cow<'_, str>, TmxError> {
    let (encoding, bom_len) = match Encoding::for_bom(bytes) {
        Some(found) => found,
        None if bytes.starts_with(&[0x3C, 0x00, 0x3F, 0x00]) => (UTF_16LE, 0),
        None if bytes.starts_with(&[0x00, 0x3C, 0x00, 0x3F]) => (UTF_16BE, 0),
        None => (declared_encoding(bytes).unwrap_or(UTF_8), 0),
    };
    let body = &bytes[bom_len..];

    if encoding == UTF_8 {
        return std::str::from_utf8(body).map(Cow::Borrowed).map_err(|e| {
            malformed((bom_len + e.valid_up_to()) as u64, format!("invalid UTF-8: {}", e))
        });
    }

    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(malformed(
            bom_len as u64,
            format!("input is not valid {}", encoding.name()),
        ));
    }
    Ok(text)
}

/// Parse a complete XML document and return its root element.
///
/// Input may be in any encoding `encoding_rs` knows; it is transcoded to
/// UTF-8 before tokenizing. Entities declared in an internal DTD subset are
/// not expanded.
pub(crate) fn parse_document(bytes: &[u8]) -> Result<Element, TmxError> {
    let text = decode_input(bytes)?;
    let mut reader = Reader::from_reader(text.as_bytes());
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| malformed(reader.error_position() as u64, e.to_string()))?;

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(malformed(position, "multiple root elements"));
                }
                stack.push(element_from_start(&start, position)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start, position)?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed(position, "unexpected closing tag"))?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::Text(text) => {
                let value = text
                    .unescape()
                    .map_err(|e| malformed(position, e.to_string()))?;
                if stack.is_empty() {
                    if !value.trim().is_empty() {
                        return Err(malformed(position, "text outside the root element"));
                    }
                } else {
                    push_node(&mut stack, Node::Text(value.into_owned()));
                }
            }
            Event::CData(data) => {
                if stack.is_empty() {
                    return Err(malformed(position, "CDATA outside the root element"));
                }
                let value = decode_utf8(&data, position)?;
                push_node(&mut stack, Node::CData(value));
            }
            Event::Comment(comment) => {
                let value = decode_utf8(&comment, position)?;
                push_node(&mut stack, Node::Comment(value));
            }
            Event::PI(instruction) => {
                let value = decode_utf8(&instruction, position)?;
                push_node(&mut stack, Node::ProcessingInstruction(value));
            }
            Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(malformed(
            reader.buffer_position() as u64,
            format!("unexpected end of input inside <{}>", open.name),
        ));
    }
    root.ok_or_else(|| malformed(0, "document is empty"))
}

/// Serialize `root` as a UTF-8 document with an XML declaration.
pub(crate) fn serialize_document(root: &Element) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    write_element(&mut out, root, 0, true);
    out.push('\n');
    out
}

fn push_indent(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_element(out: &mut String, element: &Element, depth: usize, pretty: bool) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    if pretty && element.is_indentable() {
        for node in &element.children {
            if matches!(node, Node::Text(_)) {
                continue;
            }
            push_indent(out, depth + 1);
            write_node(out, node, depth + 1, true);
        }
        push_indent(out, depth);
    } else {
        for node in &element.children {
            write_node(out, node, depth + 1, false);
        }
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn write_node(out: &mut String, node: &Node, depth: usize, pretty: bool) {
    match node {
        Node::Element(element) => write_element(out, element, depth, pretty),
        Node::Text(value) => {
            let escaped: Cow<'_, str> = partial_escape(value.as_str());
            out.push_str(&escaped);
        }
        Node::CData(value) => {
            out.push_str("<![CDATA[");
            out.push_str(value);
            out.push_str("]]>");
        }
        Node::Comment(value) => {
            out.push_str("<!--");
            out.push_str(value);
            out.push_str("-->");
        }
        Node::ProcessingInstruction(value) => {
            out.push_str("<?");
            out.push_str(value);
            out.push_str("?>");
        }
    }
}
