//! Error types
//!
//! Every error is terminal for the session that produced it. The taxonomy
//! follows where the failure happened: opening the byte source, tokenizing
//! malformed XML, violating the dump grammar, or converting a field.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::RecordKind;

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by a decoding session
#[derive(Debug, Error)]
pub enum Error {
    /// The dump file could not be opened.
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// An error from the underlying byte source.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The input is not well-formed XML.
    #[error(transparent)]
    Xml(#[from] XmlError),
    /// The outermost element does not name the expected record kind.
    #[error("expected <{expected}> wrapper element, found {found}")]
    WrongWrapper { expected: &'static str, found: String },
    /// Something other than a row element appeared inside the wrapper.
    #[error("unexpected token {found}, expected row start")]
    UnexpectedToken { found: String },
    /// A row attribute could not be decoded.
    #[error("row {row}: {source}")]
    Field {
        row: u64,
        #[source]
        source: FieldError,
    },
}

impl Error {
    /// The field error behind this error, if it is one
    pub fn field_error(&self) -> Option<&FieldError> {
        match self {
            Error::Field { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Malformed-XML error with the byte offset where the construct started
#[derive(Debug, Error)]
#[error("malformed XML at byte {position}: {kind}")]
pub struct XmlError {
    pub kind: XmlErrorKind,
    pub position: u64,
}

/// What made the XML malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlErrorKind {
    #[error("unexpected end of input inside {0}")]
    UnexpectedEof(&'static str),
    #[error("input ended before </{0}>")]
    UnclosedElement(String),
    #[error("end tag </{found}> does not match <{expected}>")]
    MismatchedTag { expected: String, found: String },
    #[error("end tag </{0}> without matching start tag")]
    UnexpectedEndTag(String),
    #[error("invalid element or target name")]
    InvalidName,
    #[error("unsupported markup declaration")]
    UnsupportedMarkup,
    #[error("{0}")]
    Attribute(&'static str),
    #[error("invalid entity reference '&{0}'")]
    InvalidEntity(String),
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("character data outside the root element")]
    TextOutsideRoot,
}

/// Errors converting one attribute into a record field
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("unknown {kind} field: '{name}'")]
    UnknownField { kind: RecordKind, name: String },
    #[error("field '{field}': invalid integer '{value}': {source}")]
    InvalidInteger {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("field '{field}': invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("field '{field}': invalid flag '{value}'")]
    InvalidFlag { field: &'static str, value: String },
    #[error("field '{field}': invalid JSON payload: {source}")]
    InvalidJson {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
