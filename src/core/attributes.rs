//! XML Attribute Parsing
//!
//! Parses XML attributes from tag content into owned name/value pairs.
//! Row elements carry every field as an attribute, so values are decoded
//! once here and then moved into record fields without another copy.

use super::entities::decode_text;
use super::scanner::{is_whitespace, name_len};
use crate::error::XmlErrorKind;

/// A parsed XML attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as written in the source
    pub name: String,
    /// Attribute value (entities decoded)
    pub value: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between element name and '>' or '/>'.
/// Values must be quoted, must not contain '<', and entity references must
/// be well-formed.
pub fn parse_attributes(input: &[u8]) -> Result<Vec<Attribute>, XmlErrorKind> {
    let mut attrs = Vec::new();
    let mut pos = 0;

    loop {
        let ws_start = pos;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            break;
        }
        if pos == ws_start && !attrs.is_empty() {
            return Err(XmlErrorKind::Attribute("attributes must be separated by whitespace"));
        }

        let len = name_len(&input[pos..]);
        if len == 0 {
            return Err(XmlErrorKind::Attribute(
                "attribute name must start with letter, underscore, or colon",
            ));
        }
        let name = utf8(&input[pos..pos + len])?;
        pos += len;

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if input.get(pos) != Some(&b'=') {
            return Err(XmlErrorKind::Attribute("attribute value required"));
        }
        pos += 1;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        let quote = match input.get(pos) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => return Err(XmlErrorKind::Attribute("attribute value must be quoted")),
        };
        pos += 1;

        let value_len = input[pos..]
            .iter()
            .position(|&b| b == quote)
            .ok_or(XmlErrorKind::Attribute("attribute value has mismatched quotes"))?;
        let raw = &input[pos..pos + value_len];
        if memchr::memchr(b'<', raw).is_some() {
            return Err(XmlErrorKind::Attribute("attribute value cannot contain '<'"));
        }
        let value = utf8(&decode_text(raw)?)?;
        pos += value_len + 1;

        attrs.push(Attribute { name, value });
    }

    Ok(attrs)
}

fn utf8(bytes: &[u8]) -> Result<String, XmlErrorKind> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| XmlErrorKind::InvalidUtf8)
}
