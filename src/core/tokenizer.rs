//! XML Tokenizer - streaming pull parser over a buffered byte source
//!
//! Extracts owned XML tokens one at a time:
//! - Element start/end tags and empty-element tags
//! - Text content
//! - CDATA sections
//! - Comments
//! - Processing instructions (including the XML declaration)
//! - DOCTYPE declarations
//!
//! Only the bytes of the construct being tokenized are held in memory, so
//! multi-gigabyte dumps stream in bounded space. Well-formedness is
//! enforced as tokens are produced: tags must balance, markup must be
//! terminated, attribute values quoted, entity references known.

use std::io::Read;

use memchr::memchr;

use super::attributes::{parse_attributes, Attribute};
use super::entities::decode_text;
use super::scanner::{
    find_byte_end, find_doctype_end, find_sequence_end, find_tag_end_quoted, is_whitespace,
    name_len, ScanCursor,
};
use crate::error::{Error, Result, XmlError, XmlErrorKind};
use crate::reader::buffered::BufferedReader;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Current parsing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Initial state before parsing starts
    Init,
    /// Between constructs
    Content,
    /// End of input reached
    Done,
}

/// Element name and attributes of a start or empty-element tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

/// A parsed XML token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Element start tag: <element>
    StartTag(Tag),
    /// Empty element: <element/>
    EmptyTag(Tag),
    /// Element end tag: </element>
    EndTag(String),
    /// Text content (entities decoded)
    Text(String),
    /// CDATA section: <![CDATA[...]]>
    CData(String),
    /// Comment: <!--...-->
    Comment(String),
    /// Processing instruction or XML declaration: <?target data?>
    ProcessingInstruction { target: String, data: String },
    /// DOCTYPE declaration body
    DocType(String),
}

/// XML tokenizer implementing a pull-parser pattern over a `Read` source
pub struct Tokenizer<R: Read> {
    input: BufferedReader<R>,
    state: ParseState,
    /// Names of currently open elements, innermost last
    open: Vec<String>,
    /// Drop whitespace-only text instead of producing `Token::Text`
    skip_whitespace: bool,
}

impl<R: Read> Tokenizer<R> {
    /// Create a new tokenizer over a buffered source
    pub fn new(input: BufferedReader<R>) -> Self {
        Tokenizer {
            input,
            state: ParseState::Init,
            open: Vec::with_capacity(4),
            skip_whitespace: false,
        }
    }

    /// Consume whitespace between elements without producing tokens
    pub fn skip_whitespace(mut self, skip: bool) -> Self {
        self.skip_whitespace = skip;
        self
    }

    /// Byte offset of the next token in the source
    pub fn position(&self) -> u64 {
        self.input.offset()
    }

    /// Release the underlying byte source; see [`BufferedReader::release`]
    pub fn release(&mut self) -> bool {
        self.state = ParseState::Done;
        self.input.release()
    }

    /// Get the next token, or `None` at the end of a well-formed input
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if self.state == ParseState::Done {
            return Ok(None);
        }

        if self.state == ParseState::Init {
            self.ensure(UTF8_BOM.len())?;
            if self.input.buffered().starts_with(UTF8_BOM) {
                self.input.consume(UTF8_BOM.len());
            }
            self.state = ParseState::Content;
        }

        loop {
            if !self.ensure(1)? {
                self.state = ParseState::Done;
                if let Some(name) = self.open.pop() {
                    return Err(self.error(XmlErrorKind::UnclosedElement(name)));
                }
                return Ok(None);
            }

            if self.input.buffered()[0] == b'<' {
                return self.read_markup().map(Some);
            }
            if let Some(text) = self.read_text()? {
                return Ok(Some(text));
            }
        }
    }

    /// Make at least `n` bytes available; `false` if the input ends first
    fn ensure(&mut self, n: usize) -> Result<bool> {
        Ok(self.input.fill_to(n)?)
    }

    /// Fill until `finder` locates the end of the current construct
    ///
    /// The cursor carries over between reads, so each byte is searched once.
    fn scan<F>(&mut self, from: usize, context: &'static str, finder: F) -> Result<usize>
    where
        F: Fn(&[u8], &mut ScanCursor) -> Option<usize>,
    {
        let mut cursor = ScanCursor::at(from);
        loop {
            if let Some(end) = finder(self.input.buffered(), &mut cursor) {
                return Ok(end);
            }
            if !self.input.fill_buffer()? {
                return Err(self.error(XmlErrorKind::UnexpectedEof(context)));
            }
        }
    }

    fn read_markup(&mut self) -> Result<Token> {
        // Longest prefix we classify on is "<![CDATA["
        self.ensure(9)?;
        let head = self.input.buffered();

        let (end, result) = if head.starts_with(b"<?") {
            let end = self.scan(2, "processing instruction", |w, cursor| {
                find_sequence_end(w, cursor, b"?>")
            })?;
            (end, parse_pi(&self.input.buffered()[..end]))
        } else if head.starts_with(b"<!--") {
            let end = self.scan(4, "comment", |w, cursor| find_sequence_end(w, cursor, b"-->"))?;
            let content = &self.input.buffered()[4..end - 3];
            (end, utf8(content).map(Token::Comment))
        } else if head.starts_with(b"<![CDATA[") {
            let end = self.scan(9, "CDATA section", |w, cursor| {
                find_sequence_end(w, cursor, b"]]>")
            })?;
            let content = &self.input.buffered()[9..end - 3];
            (end, utf8(content).map(Token::CData))
        } else if head.starts_with(b"<!DOCTYPE") {
            let end = self.scan(9, "DOCTYPE declaration", find_doctype_end)?;
            let content = trim(&self.input.buffered()[9..end - 1]);
            (end, utf8(content).map(Token::DocType))
        } else if head.starts_with(b"<!") {
            return Err(self.error(XmlErrorKind::UnsupportedMarkup));
        } else if head.starts_with(b"</") {
            let end = self.scan(2, "end tag", |w, cursor| find_byte_end(w, cursor, b'>'))?;
            let result = parse_end_tag(&self.input.buffered()[..end]);
            let result = match result {
                Ok(name) => self.close_element(name),
                Err(kind) => Err(kind),
            };
            (end, result)
        } else {
            let end = self.scan(1, "start tag", find_tag_end_quoted)?;
            let result = parse_start_tag(&self.input.buffered()[..end]);
            if let Ok(Token::StartTag(tag)) = &result {
                self.open.push(tag.name.clone());
            }
            (end, result)
        };

        match result {
            Ok(token) => {
                self.input.consume(end);
                Ok(token)
            }
            Err(kind) => Err(self.error(kind)),
        }
    }

    /// Read character data up to the next `<`; `None` if it was skipped
    fn read_text(&mut self) -> Result<Option<Token>> {
        let mut from = 0;
        let end = loop {
            let window = self.input.buffered();
            if let Some(offset) = memchr(b'<', &window[from..]) {
                break from + offset;
            }
            from = window.len();
            if !self.input.fill_buffer()? {
                break from;
            }
        };

        let raw = &self.input.buffered()[..end];
        let blank = raw.iter().all(|&b| is_whitespace(b));
        if blank && self.skip_whitespace {
            self.input.consume(end);
            return Ok(None);
        }

        let result = if self.open.is_empty() && !blank {
            Err(XmlErrorKind::TextOutsideRoot)
        } else {
            decode_text(raw).and_then(|text| utf8(&text))
        };

        match result {
            Ok(text) => {
                self.input.consume(end);
                Ok(Some(Token::Text(text)))
            }
            Err(kind) => Err(self.error(kind)),
        }
    }

    fn close_element(&mut self, name: String) -> std::result::Result<Token, XmlErrorKind> {
        match self.open.pop() {
            Some(expected) if expected == name => Ok(Token::EndTag(name)),
            Some(expected) => Err(XmlErrorKind::MismatchedTag {
                expected,
                found: name,
            }),
            None => Err(XmlErrorKind::UnexpectedEndTag(name)),
        }
    }

    fn error(&self, kind: XmlErrorKind) -> Error {
        Error::Xml(XmlError {
            kind,
            position: self.input.offset(),
        })
    }
}

/// Parse `<name attr="v" ...>` or `<name .../>`
fn parse_start_tag(bytes: &[u8]) -> std::result::Result<Token, XmlErrorKind> {
    let inner = &bytes[1..bytes.len() - 1];
    let (inner, is_empty) = match inner.strip_suffix(b"/") {
        Some(inner) => (inner, true),
        None => (inner, false),
    };

    let len = name_len(inner);
    if len == 0 {
        return Err(XmlErrorKind::InvalidName);
    }
    let rest = &inner[len..];
    if rest.first().is_some_and(|&b| !is_whitespace(b)) {
        return Err(XmlErrorKind::InvalidName);
    }

    let tag = Tag {
        name: utf8(&inner[..len])?,
        attributes: parse_attributes(rest)?,
    };
    Ok(if is_empty {
        Token::EmptyTag(tag)
    } else {
        Token::StartTag(tag)
    })
}

/// Parse `</name>` and return the name
fn parse_end_tag(bytes: &[u8]) -> std::result::Result<String, XmlErrorKind> {
    let inner = &bytes[2..bytes.len() - 1];
    let len = name_len(inner);
    if len == 0 || !inner[len..].iter().all(|&b| is_whitespace(b)) {
        return Err(XmlErrorKind::InvalidName);
    }
    utf8(&inner[..len])
}

/// Parse `<?target data?>`
fn parse_pi(bytes: &[u8]) -> std::result::Result<Token, XmlErrorKind> {
    let inner = &bytes[2..bytes.len() - 2];
    let len = name_len(inner);
    if len == 0 {
        return Err(XmlErrorKind::InvalidName);
    }
    Ok(Token::ProcessingInstruction {
        target: utf8(&inner[..len])?,
        data: utf8(trim(&inner[len..]))?,
    })
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| !is_whitespace(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| !is_whitespace(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

fn utf8(bytes: &[u8]) -> std::result::Result<String, XmlErrorKind> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| XmlErrorKind::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tokenizer(input: &str) -> Tokenizer<Cursor<Vec<u8>>> {
        Tokenizer::new(BufferedReader::new(Cursor::new(input.as_bytes().to_vec())))
    }

    fn collect(input: &str) -> Result<Vec<Token>> {
        let mut t = tokenizer(input);
        let mut tokens = Vec::new();
        while let Some(token) = t.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn xml_kind(err: Error) -> XmlErrorKind {
        match err {
            Error::Xml(e) => e.kind,
            other => panic!("expected XML error, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_document() {
        let tokens = collect("<?xml version=\"1.0\"?>\n<tags>\n  <row Id=\"1\" />\n</tags>").unwrap();
        assert_eq!(tokens.len(), 7);
        assert!(matches!(
            &tokens[0],
            Token::ProcessingInstruction { target, .. } if target == "xml"
        ));
        assert!(matches!(&tokens[1], Token::Text(t) if t == "\n"));
        assert!(matches!(&tokens[2], Token::StartTag(tag) if tag.name == "tags"));
        assert!(matches!(&tokens[4], Token::EmptyTag(tag) if tag.name == "row"
            && tag.attributes == vec![Attribute::new("Id", "1")]));
        assert_eq!(tokens[6], Token::EndTag("tags".to_string()));
    }

    #[test]
    fn test_skips_bom() {
        let tokens = collect("\u{feff}<a></a>").unwrap();
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_small_buffer_spanning_tokens() {
        let body = "x".repeat(200);
        let input = format!("<posts><row Body=\"{body} &amp; &gt;\"/></posts>");
        let mut t = Tokenizer::new(BufferedReader::with_capacity(
            Cursor::new(input.into_bytes()),
            16,
        ));
        assert!(matches!(t.next_token().unwrap(), Some(Token::StartTag(_))));
        match t.next_token().unwrap() {
            Some(Token::EmptyTag(tag)) => {
                assert_eq!(tag.attributes[0].value, format!("{body} & >"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(t.next_token().unwrap(), Some(Token::EndTag(_))));
        assert!(t.next_token().unwrap().is_none());
    }

    #[test]
    fn test_comment_cdata_doctype() {
        let tokens = collect("<!DOCTYPE votes><votes><!-- c --><![CDATA[<x>]]></votes>").unwrap();
        assert_eq!(tokens[0], Token::DocType("votes".to_string()));
        assert_eq!(tokens[2], Token::Comment(" c ".to_string()));
        assert_eq!(tokens[3], Token::CData("<x>".to_string()));
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = collect("<users><row></users>").unwrap_err();
        assert_eq!(
            xml_kind(err),
            XmlErrorKind::MismatchedTag {
                expected: "row".to_string(),
                found: "users".to_string()
            }
        );
    }

    #[test]
    fn test_unclosed_root() {
        let err = collect("<users><row/>").unwrap_err();
        assert_eq!(xml_kind(err), XmlErrorKind::UnclosedElement("users".to_string()));
    }

    #[test]
    fn test_truncated_tag() {
        let err = collect("<users><row Id=\"1").unwrap_err();
        assert_eq!(xml_kind(err), XmlErrorKind::UnexpectedEof("start tag"));
    }

    #[test]
    fn test_stray_end_tag() {
        let err = collect("</users>").unwrap_err();
        assert_eq!(xml_kind(err), XmlErrorKind::UnexpectedEndTag("users".to_string()));
    }

    #[test]
    fn test_text_outside_root() {
        let err = collect("garbage<a/>").unwrap_err();
        assert_eq!(xml_kind(err), XmlErrorKind::TextOutsideRoot);
    }

    #[test]
    fn test_error_position() {
        let mut t = tokenizer("<a><b></c></a>");
        t.next_token().unwrap();
        t.next_token().unwrap();
        match t.next_token() {
            Err(Error::Xml(e)) => assert_eq!(e.position, 6),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_release_stops_tokens() {
        let mut t = tokenizer("<a><b/></a>");
        t.next_token().unwrap();
        assert!(t.release());
        assert!(!t.release());
        assert!(t.next_token().unwrap().is_none());
    }

    #[test]
    fn test_skip_whitespace() {
        let input = "<votes>\r\n  <row Id=\"1\" />\r\n  <row Id=\"2\" />\r\n</votes>\n";
        let mut t = tokenizer(input).skip_whitespace(true);
        let mut tokens = Vec::new();
        while let Some(token) = t.next_token().unwrap() {
            tokens.push(token);
        }
        assert_eq!(tokens.len(), 4);
        assert!(!tokens.iter().any(|t| matches!(t, Token::Text(_))));

        let mut t = tokenizer("<a> x </a>").skip_whitespace(true);
        t.next_token().unwrap();
        assert_eq!(t.next_token().unwrap(), Some(Token::Text(" x ".to_string())));
    }

    #[test]
    fn test_skip_whitespace_still_rejects_text_outside_root() {
        let mut t = tokenizer("<a/>junk").skip_whitespace(true);
        t.next_token().unwrap();
        assert_eq!(xml_kind(t.next_token().unwrap_err()), XmlErrorKind::TextOutsideRoot);
    }
}
