//! XML Entity Decoding
//!
//! Handles decoding of XML entities:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow for zero-copy when no entities are present. Dump files carry
//! post bodies with escaped markup in every row, so the slow path is hot.

use memchr::memchr;
use std::borrow::Cow;

use crate::error::XmlErrorKind;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy),
/// returns Owned if entities were decoded. Unknown or unterminated
/// references are errors.
#[inline]
pub fn decode_text(input: &[u8]) -> Result<Cow<'_, [u8]>, XmlErrorKind> {
    if memchr(b'&', input).is_none() {
        return Ok(Cow::Borrowed(input));
    }
    decode_entities(input).map(Cow::Owned)
}

fn decode_entities(input: &[u8]) -> Result<Vec<u8>, XmlErrorKind> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while let Some(amp_offset) = memchr(b'&', &input[pos..]) {
        result.extend_from_slice(&input[pos..pos + amp_offset]);
        pos += amp_offset;

        let semi_offset = memchr(b';', &input[pos..]).ok_or_else(|| invalid(&input[pos..]))?;
        let entity = &input[pos + 1..pos + semi_offset];

        match entity {
            b"lt" => result.push(b'<'),
            b"gt" => result.push(b'>'),
            b"amp" => result.push(b'&'),
            b"quot" => result.push(b'"'),
            b"apos" => result.push(b'\''),
            [b'#', digits @ ..] => {
                let c = decode_char_ref(digits).ok_or_else(|| invalid(entity))?;
                let mut utf8 = [0u8; 4];
                result.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
            _ => return Err(invalid(entity)),
        }
        pos += semi_offset + 1;
    }

    result.extend_from_slice(&input[pos..]);
    Ok(result)
}

/// Decode the digits of `&#...;` / `&#x...;` into a character
fn decode_char_ref(digits: &[u8]) -> Option<char> {
    let (radix, digits) = match digits {
        [b'x' | b'X', hex @ ..] => (16, hex),
        dec => (10, dec),
    };
    if digits.is_empty() {
        return None;
    }
    let digits = std::str::from_utf8(digits).ok()?;
    let value = u32::from_str_radix(digits, radix).ok()?;
    if value == 0 {
        return None;
    }
    char::from_u32(value)
}

fn invalid(entity: &[u8]) -> XmlErrorKind {
    let shown = &entity[..entity.len().min(16)];
    XmlErrorKind::InvalidEntity(String::from_utf8_lossy(shown).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities_borrows() {
        let out = decode_text(b"plain text").unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_builtin_entities() {
        let out = decode_text(b"&lt;p&gt;Tom &amp; &quot;Jerry&apos;s&quot;&lt;/p&gt;").unwrap();
        assert_eq!(out.as_ref(), b"<p>Tom & \"Jerry's\"</p>");
    }

    #[test]
    fn test_numeric_references() {
        let out = decode_text(b"line&#xA;next&#10;&#233;").unwrap();
        assert_eq!(std::str::from_utf8(&out).unwrap(), "line\nnext\n\u{e9}");
    }

    #[test]
    fn test_unknown_entity_is_error() {
        assert!(matches!(decode_text(b"&nbsp;"), Err(XmlErrorKind::InvalidEntity(_))));
    }

    #[test]
    fn test_unterminated_reference_is_error() {
        assert!(decode_text(b"fish & chips").is_err());
        assert!(decode_text(b"&#xZZ;").is_err());
    }
}
