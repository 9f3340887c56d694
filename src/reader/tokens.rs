//! Token stream adapter
//!
//! Presents the row decoder with a clean event sequence: character data
//! between elements, comments, CDATA and DOCTYPE are skipped, and an
//! empty-element tag is expanded into a start event followed by a
//! synthesized end event. Processing instructions are only reported in the
//! prolog, where the XML declaration lives; once the root element has
//! started they are skipped too. Malformed-XML errors pass through
//! unchanged.

use std::io::Read;

use super::buffered::BufferedReader;
use super::events::{EndElement, XmlEvent};
use crate::core::tokenizer::{Token, Tokenizer};
use crate::error::Result;

/// Filtered event stream over a tokenizer
pub struct TokenStream<R: Read> {
    tokenizer: Tokenizer<R>,
    /// End event owed for the last empty-element tag
    pending_end: Option<EndElement>,
    /// Set once the root element has started
    in_root: bool,
}

impl<R: Read> TokenStream<R> {
    /// Create an event stream over a buffered byte source
    pub fn new(input: BufferedReader<R>) -> Self {
        TokenStream {
            tokenizer: Tokenizer::new(input).skip_whitespace(true),
            pending_end: None,
            in_root: false,
        }
    }

    /// Get the next significant event, or `None` at end of stream
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>> {
        if let Some(end) = self.pending_end.take() {
            return Ok(Some(XmlEvent::EndElement(end)));
        }

        while let Some(token) = self.tokenizer.next_token()? {
            let event = match token {
                Token::StartTag(tag) => {
                    self.in_root = true;
                    XmlEvent::StartElement(tag.into())
                }
                Token::EmptyTag(tag) => {
                    self.in_root = true;
                    self.pending_end = Some(EndElement {
                        name: tag.name.clone(),
                    });
                    XmlEvent::StartElement(tag.into())
                }
                Token::EndTag(name) => XmlEvent::EndElement(EndElement { name }),
                Token::ProcessingInstruction { .. } if self.in_root => continue,
                Token::ProcessingInstruction { target, data } => {
                    XmlEvent::ProcessingInstruction { target, data }
                }
                Token::Text(_) | Token::CData(_) | Token::Comment(_) | Token::DocType(_) => {
                    continue
                }
            };
            return Ok(Some(event));
        }
        Ok(None)
    }

    /// Byte offset of the next unread construct
    pub fn position(&self) -> u64 {
        self.tokenizer.position()
    }

    /// Release (close) the byte source; `true` only on the first call
    pub fn release(&mut self) -> bool {
        self.pending_end = None;
        self.tokenizer.release()
    }
}
