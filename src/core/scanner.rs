//! SIMD-accelerated delimiter search using memchr
//!
//! The tokenizer works on a window of buffered bytes that may end in the
//! middle of a construct. Every finder here returns the offset just past the
//! terminating delimiter, or `None` when the window holds no terminator yet.

use memchr::{memchr, memchr3, memmem};

/// Where a search stopped in a window that held no terminator yet
///
/// Passing the same cursor back after the window has grown resumes the
/// search instead of rescanning, so a row that arrives in many small reads
/// is still scanned once. Offsets are relative to the window start, which
/// stays fixed while a construct is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCursor {
    pub pos: usize,
    /// Open quote character, for finders that skip quoted values
    pub quote: Option<u8>,
    /// `[` nesting depth inside a DOCTYPE
    pub depth: usize,
}

impl ScanCursor {
    pub fn at(pos: usize) -> Self {
        ScanCursor {
            pos,
            ..ScanCursor::default()
        }
    }
}

/// Find the end of a start tag (`>`), skipping `>` inside quoted attribute values
#[inline]
pub fn find_tag_end_quoted(window: &[u8], cursor: &mut ScanCursor) -> Option<usize> {
    while cursor.pos < window.len() {
        let rest = &window[cursor.pos..];
        match cursor.quote {
            Some(q) => match memchr(q, rest) {
                Some(offset) => {
                    cursor.pos += offset + 1;
                    cursor.quote = None;
                }
                None => break,
            },
            None => match memchr3(b'>', b'"', b'\'', rest) {
                Some(offset) => {
                    cursor.pos += offset;
                    let b = window[cursor.pos];
                    cursor.pos += 1;
                    if b == b'>' {
                        return Some(cursor.pos);
                    }
                    cursor.quote = Some(b);
                }
                None => break,
            },
        }
    }
    cursor.pos = window.len();
    None
}

/// Find the end of an end tag (`>`); end tags never carry quotes
#[inline]
pub fn find_byte_end(window: &[u8], cursor: &mut ScanCursor, byte: u8) -> Option<usize> {
    let found = memchr(byte, window.get(cursor.pos..)?).map(|offset| cursor.pos + offset + 1);
    if found.is_none() {
        cursor.pos = window.len();
    }
    found
}

/// Find the end of a multi-byte terminator such as `-->`, `?>` or `]]>`
#[inline]
pub fn find_sequence_end(window: &[u8], cursor: &mut ScanCursor, needle: &[u8]) -> Option<usize> {
    let found = memmem::find(window.get(cursor.pos..)?, needle)
        .map(|offset| cursor.pos + offset + needle.len());
    if found.is_none() {
        // A terminator split across reads starts in the last few bytes
        let tail = window.len().saturating_sub(needle.len() - 1);
        cursor.pos = cursor.pos.max(tail);
    }
    found
}

/// Find the end of a DOCTYPE declaration, honoring an internal subset in `[...]`
pub fn find_doctype_end(window: &[u8], cursor: &mut ScanCursor) -> Option<usize> {
    while let Some(&b) = window.get(cursor.pos) {
        cursor.pos += 1;
        match (cursor.quote, b) {
            (Some(q), _) if b == q => cursor.quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => cursor.quote = Some(b),
            (None, b'[') => cursor.depth += 1,
            (None, b']') => cursor.depth = cursor.depth.saturating_sub(1),
            (None, b'>') if cursor.depth == 0 => return Some(cursor.pos),
            _ => {}
        }
    }
    None
}

/// Length of the XML name at the start of `input` (0 if none)
#[inline]
pub fn name_len(input: &[u8]) -> usize {
    match input.first() {
        Some(&b) if is_name_start_char(b) => {
            1 + input[1..].iter().take_while(|&&b| is_name_char(b)).count()
        }
        _ => 0,
    }
}

/// Check if byte is a valid XML NameStartChar (ASCII only, non-ASCII accepted)
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Check if byte is valid in XML name
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

/// Check if byte is whitespace
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}
