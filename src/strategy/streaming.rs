//! Streaming row decoder
//!
//! A [`RowReader`] walks one dump file row by row in bounded memory. The
//! wrapper start element is validated when the session opens; each
//! [`RowReader::advance`] then decodes exactly one `<row>` into a reused
//! record buffer. The first row is not decoded until the first advance.
//!
//! Every error is terminal: it is stored, the byte source is released, and
//! later advances return `false`. Reaching the wrapper end element is the
//! clean finish and also releases the source.

use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::error::{Error, Result, XmlError, XmlErrorKind};
use crate::reader::buffered::{BufferedReader, DEFAULT_BUFFER_SIZE};
use crate::reader::events::XmlEvent;
use crate::reader::tokens::TokenStream;
use crate::schema::{
    decode_row, Badge, Comment, Post, PostHistory, PostLink, RecordKind, Schema, Tag, User, Vote,
    ROW,
};

/// Session tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Initial read buffer size; grows on demand for oversized rows
    pub buffer_capacity: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            buffer_capacity: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Rows may remain
    Streaming,
    /// The wrapper element closed
    Finished,
    /// An error was stored
    Failed,
    /// Closed by the caller before the end
    Closed,
}

/// Decoding session over one dump file
pub struct RowReader<R: Read, S: Schema> {
    events: TokenStream<R>,
    record: S,
    state: SessionState,
    error: Option<Error>,
    rows: u64,
}

impl<R: Read, S: Schema> RowReader<R, S> {
    /// Open a session over a byte source with default options
    pub fn new(reader: R) -> Result<Self> {
        Self::with_options(reader, ReaderOptions::default())
    }

    /// Open a session, validating the wrapper element
    ///
    /// On a wrong wrapper (or any other failure) the source is dropped and
    /// no session is produced.
    pub fn with_options(reader: R, options: ReaderOptions) -> Result<Self> {
        let input = BufferedReader::with_capacity(reader, options.buffer_capacity);
        let mut events = TokenStream::new(input);

        if let Err(e) = expect_wrapper(&mut events, S::KIND) {
            events.release();
            warn!(kind = %S::KIND, error = %e, "failed to open dump");
            return Err(e);
        }
        debug!(kind = %S::KIND, "opened dump");

        Ok(RowReader {
            events,
            record: S::default(),
            state: SessionState::Streaming,
            error: None,
            rows: 0,
        })
    }

    /// Decode the next row into the record buffer
    ///
    /// Returns `false` at the end of the file, after an error, or once
    /// closed; check [`err`](Self::err) to tell the first two apart.
    pub fn advance(&mut self) -> bool {
        if self.state != SessionState::Streaming {
            return false;
        }
        match self.step() {
            Ok(true) => {
                self.rows += 1;
                trace!(kind = %S::KIND, row = self.rows, "decoded row");
                true
            }
            Ok(false) => {
                self.events.release();
                self.state = SessionState::Finished;
                debug!(kind = %S::KIND, rows = self.rows, "finished dump");
                false
            }
            Err(e) => {
                self.events.release();
                self.record = S::default();
                self.state = SessionState::Failed;
                warn!(kind = %S::KIND, row = self.rows + 1, error = %e, "failed to decode dump");
                self.error = Some(e);
                false
            }
        }
    }

    fn step(&mut self) -> Result<bool> {
        let mut event = self.next_event()?;
        if event.is_end_named(ROW) {
            event = self.next_event()?;
        }
        if event.is_end_named(S::KIND.wrapper_name()) {
            return Ok(false);
        }

        let row = match event.into_start_element() {
            Ok(start) if start.is_named(ROW) => start,
            Ok(start) => {
                return Err(Error::UnexpectedToken {
                    found: XmlEvent::StartElement(start).to_string(),
                })
            }
            Err(other) => {
                return Err(Error::UnexpectedToken {
                    found: other.to_string(),
                })
            }
        };

        decode_row(row.attributes, &mut self.record).map_err(|source| Error::Field {
            row: self.rows + 1,
            source,
        })?;
        Ok(true)
    }

    fn next_event(&mut self) -> Result<XmlEvent> {
        match self.events.next_event()? {
            Some(event) => Ok(event),
            None => Err(eof_error(&self.events, "wrapper element")),
        }
    }

    /// The record decoded by the last successful advance
    pub fn record(&self) -> &S {
        &self.record
    }

    /// Move the current record out, leaving a default in its place
    pub fn take_record(&mut self) -> S {
        std::mem::take(&mut self.record)
    }

    /// The error that stopped the session, if any
    pub fn err(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Take ownership of the stored error
    pub fn take_err(&mut self) -> Option<Error> {
        self.error.take()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the wrapper element closed cleanly
    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// Rows decoded so far
    pub fn rows_read(&self) -> u64 {
        self.rows
    }

    pub fn kind(&self) -> RecordKind {
        S::KIND
    }

    /// Release the byte source; later advances return `false`
    ///
    /// Safe to call at any point and any number of times.
    pub fn close(&mut self) {
        if self.events.release() {
            debug!(kind = %S::KIND, rows = self.rows, "closed dump");
        }
        if self.state == SessionState::Streaming {
            self.state = SessionState::Closed;
        }
    }

    /// Iterate over owned records
    ///
    /// A stored error is yielded once as the final item.
    pub fn into_records(self) -> Records<R, S> {
        Records {
            reader: self,
            done: false,
        }
    }
}

impl<S: Schema> RowReader<File, S> {
    /// Open a dump file with default options
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, ReaderOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), kind = %S::KIND, "opening dump file");
        Self::with_options(file, options)
    }
}

/// Read the prolog up to and including the wrapper start element
fn expect_wrapper<R: Read>(events: &mut TokenStream<R>, kind: RecordKind) -> Result<()> {
    let mut event = events.next_event()?;
    if let Some(XmlEvent::ProcessingInstruction { .. }) = event {
        event = events.next_event()?;
    }

    match event {
        Some(event) if event.is_start_named(kind.wrapper_name()) => Ok(()),
        Some(event) => Err(Error::WrongWrapper {
            expected: kind.wrapper_name(),
            found: event.to_string(),
        }),
        None => Err(eof_error(events, "document")),
    }
}

fn eof_error<R: Read>(events: &TokenStream<R>, context: &'static str) -> Error {
    Error::Xml(XmlError {
        kind: XmlErrorKind::UnexpectedEof(context),
        position: events.position(),
    })
}

/// Owned-record iterator returned by [`RowReader::into_records`]
pub struct Records<R: Read, S: Schema> {
    reader: RowReader<R, S>,
    done: bool,
}

impl<R: Read, S: Schema> Records<R, S> {
    /// Rows decoded so far
    pub fn rows_read(&self) -> u64 {
        self.reader.rows_read()
    }
}

impl<R: Read, S: Schema> Iterator for Records<R, S> {
    type Item = Result<S>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.reader.advance() {
            return Some(Ok(self.reader.take_record()));
        }
        self.done = true;
        self.reader.take_err().map(Err)
    }
}

impl<R: Read, S: Schema> FusedIterator for Records<R, S> {}

pub fn open_badges(path: impl AsRef<Path>) -> Result<RowReader<File, Badge>> {
    RowReader::open(path)
}

pub fn open_comments(path: impl AsRef<Path>) -> Result<RowReader<File, Comment>> {
    RowReader::open(path)
}

pub fn open_post_history(path: impl AsRef<Path>) -> Result<RowReader<File, PostHistory>> {
    RowReader::open(path)
}

pub fn open_post_links(path: impl AsRef<Path>) -> Result<RowReader<File, PostLink>> {
    RowReader::open(path)
}

pub fn open_posts(path: impl AsRef<Path>) -> Result<RowReader<File, Post>> {
    RowReader::open(path)
}

pub fn open_tags(path: impl AsRef<Path>) -> Result<RowReader<File, Tag>> {
    RowReader::open(path)
}

pub fn open_users(path: impl AsRef<Path>) -> Result<RowReader<File, User>> {
    RowReader::open(path)
}

pub fn open_votes(path: impl AsRef<Path>) -> Result<RowReader<File, Vote>> {
    RowReader::open(path)
}
