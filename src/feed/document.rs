//! Generic XML to nested-mapping conversion.
//!
//! Feeds are converted into an untyped tree ([`XmlValue`]) instead of a fixed
//! RSS schema, so item fields the pipeline does not know about survive the
//! conversion untouched. The conversion rules are:
//!
//! - element and attribute names use their local name (`media:thumbnail`
//!   becomes `thumbnail`, `content:encoded` becomes `encoded`)
//! - attributes are stored under `_`-prefixed keys (`url="..."` becomes `_url`)
//! - an element with only text becomes [`XmlValue::Text`]
//! - repeated sibling elements become [`XmlValue::List`], a single one stays scalar
//! - text of an element that also has attributes or children is kept under `__text`
//! - CDATA sections are treated as text
//!
//! Input is decoded to UTF-8 before parsing, using the byte order mark if
//! there is one, otherwise the `encoding` of the XML declaration, otherwise
//! UTF-8.

use std::borrow::Cow;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// SEC-003: Maximum element nesting depth accepted by the converter.
const MAX_XML_DEPTH: usize = 64;

/// How far into the input the XML declaration is searched for.
const MAX_DECLARATION_LEN: usize = 1024;

/// Key prefix for attribute values.
pub const ATTRIBUTE_PREFIX: &str = "_";

/// Key holding the text of elements that also carry attributes or children.
pub const TEXT_KEY: &str = "__text";

/// Errors that can occur while converting XML into a [`FeedDocument`].
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The bytes are not valid in the document's encoding.
    #[error("XML input is not valid {0}")]
    Decode(&'static str),

    /// The XML is not well-formed.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// SEC-003: Element nesting exceeds the safety limit.
    #[error("XML nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),

    /// The input contains no root element.
    #[error("XML document has no root element")]
    NoRoot,

    /// The input ended before an element was closed.
    #[error("XML document ended inside <{0}>")]
    UnclosedElement(String),
}

/// Ordered map of child names to values.
pub type XmlMap = BTreeMap<String, XmlValue>;

/// One node of the converted tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    /// Text-only (or empty) element
    Text(String),
    /// Element with attributes and/or child elements
    Map(XmlMap),
    /// Repeated sibling elements sharing one name, in document order
    List(Vec<XmlValue>),
}

impl XmlValue {
    /// Looks up a child or attribute key on a map value.
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        match self {
            XmlValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Follows a path of keys through nested maps.
    pub fn get_path(&self, path: &[&str]) -> Option<&XmlValue> {
        path.iter().try_fold(self, |value, key| value.get(key))
    }

    /// Text of the value.
    ///
    /// Maps yield their `__text` entry; lists yield the text of their first element.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            XmlValue::Map(map) => map.get(TEXT_KEY).and_then(XmlValue::as_text),
            XmlValue::List(items) => items.first().and_then(XmlValue::as_text),
        }
    }

    /// Value of the attribute `name` (looked up as `_name`).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.get(&format!("{ATTRIBUTE_PREFIX}{name}"))
            .and_then(XmlValue::as_text)
    }
}

/// A converted XML document.
///
/// The top-level map holds a single entry keyed by the root element's local
/// name: an RSS 2.0 file converts to `{rss: {channel: ...}}`, a document whose
/// root is `<channel>` converts to `{channel: ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDocument {
    root: XmlMap,
}

impl FeedDocument {
    /// Parses raw XML bytes into a document tree.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the bytes do not decode in the document's
    /// encoding, the XML is ill-formed or nests deeper than the safety limit,
    /// there is no root element, or the input ends inside an open element.
    ///
    /// # Security
    ///
    /// SEC-002: quick-xml (0.37) never expands `<!ENTITY>` declarations. Only
    /// the five predefined entities are resolved; custom entities fail as
    /// parse errors, so external entities cannot be pulled in.
    pub fn parse(xml: &[u8]) -> Result<Self, ConvertError> {
        let text = decode_input(xml)?;
        let mut reader = Reader::from_reader(text.as_bytes());
        let mut stack: Vec<Frame> = Vec::new();
        let mut root = XmlMap::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    if stack.len() >= MAX_XML_DEPTH {
                        return Err(ConvertError::MaxDepthExceeded(MAX_XML_DEPTH));
                    }
                    stack.push(Frame::open(&e, &reader)?);
                }
                Ok(Event::Empty(e)) => {
                    let (name, value) = Frame::open(&e, &reader)?.close();
                    attach(&mut stack, &mut root, name, value);
                }
                Ok(Event::End(_)) => {
                    if let Some(frame) = stack.pop() {
                        let (name, value) = frame.close();
                        attach(&mut stack, &mut root, name, value);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(frame) = stack.last_mut() {
                        let text = e.unescape().map_err(|e| ConvertError::Xml(e.to_string()))?;
                        frame.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(frame) = stack.last_mut() {
                        let text = reader
                            .decoder()
                            .decode(&e)
                            .map_err(|e| ConvertError::Xml(e.to_string()))?;
                        frame.text.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ConvertError::Xml(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(ConvertError::UnclosedElement(open.name.clone()));
        }
        if root.is_empty() {
            return Err(ConvertError::NoRoot);
        }

        Ok(Self { root })
    }

    /// Wraps an already-converted mapping.
    pub fn from_map(root: XmlMap) -> Self {
        Self { root }
    }

    /// Looks up a top-level key.
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        self.root.get(key)
    }
}

/// Decodes raw feed bytes to UTF-8.
///
/// A BOM wins over the declaration. UTF-16 labels in an ASCII-readable
/// declaration are ignored, since the bytes themselves are evidently not UTF-16.
fn decode_input(xml: &[u8]) -> Result<Cow<'_, str>, ConvertError> {
    let (encoding, body) = match Encoding::for_bom(xml) {
        Some((encoding, bom_len)) => (encoding, &xml[bom_len..]),
        None => (declared_encoding(xml).unwrap_or(UTF_8), xml),
    };
    if encoding != UTF_8 {
        tracing::debug!(encoding = encoding.name(), "Decoding feed to UTF-8");
    }

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or(ConvertError::Decode(encoding.name()))
}

/// Encoding named by the `<?xml ... encoding="..."?>` declaration, if any.
fn declared_encoding(xml: &[u8]) -> Option<&'static Encoding> {
    let head = xml.strip_prefix(b"<?xml")?;
    let head = &head[..head.len().min(MAX_DECLARATION_LEN)];
    let end = head.windows(2).position(|w| w == b"?>")?;
    let declaration = std::str::from_utf8(&head[..end]).ok()?;

    let rest = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = rest[1..].split(quote).next()?;

    Encoding::for_label(label.as_bytes()).filter(|e| *e != UTF_16LE && *e != UTF_16BE)
}

/// An element whose end tag has not been reached yet.
struct Frame {
    name: String,
    children: XmlMap,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Self, ConvertError> {
        let name = local_name(start.local_name().as_ref());
        let mut children = XmlMap::new();

        for attr_result in start.attributes() {
            let attr = match attr_result {
                Ok(attr) => attr,
                Err(e) => {
                    tracing::warn!(element = %name, error = %e, "Skipping malformed XML attribute");
                    continue;
                }
            };
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let value = attr
                .decode_and_unescape_value(reader.decoder())
                .map_err(|e| ConvertError::Xml(e.to_string()))?;
            children.insert(
                format!("{ATTRIBUTE_PREFIX}{}", local_name(attr.key.local_name().as_ref())),
                XmlValue::Text(value.into_owned()),
            );
        }

        Ok(Self {
            name,
            children,
            text: String::new(),
        })
    }

    fn close(self) -> (String, XmlValue) {
        let Frame {
            name,
            mut children,
            text,
        } = self;
        // Whitespace between child elements is formatting, not content
        let has_text = !text.trim().is_empty();

        let value = if children.is_empty() {
            XmlValue::Text(if has_text { text } else { String::new() })
        } else {
            if has_text {
                children.insert(TEXT_KEY.to_string(), XmlValue::Text(text));
            }
            XmlValue::Map(children)
        };
        (name, value)
    }
}

/// Adds a closed element to its parent, or to the document root.
fn attach(stack: &mut [Frame], root: &mut XmlMap, name: String, value: XmlValue) {
    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.children, name, value),
        None if root.is_empty() => {
            root.insert(name, value);
        }
        None => tracing::warn!(element = %name, "Ignoring extra root element"),
    }
}

/// Inserts a child, turning repeated names into a list.
///
/// Values produced by [`Frame::close`] are never lists, so an existing list
/// under `name` always means the element was already repeated.
fn insert_child(map: &mut XmlMap, name: String, value: XmlValue) {
    match map.entry(name) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            XmlValue::List(items) => items.push(value),
            existing => {
                let first = std::mem::replace(existing, XmlValue::List(Vec::new()));
                *existing = XmlValue::List(vec![first, value]);
            }
        },
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
