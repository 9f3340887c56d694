//! Sessions chosen at run time
//!
//! When the record kind is only known from a file name or a command-line
//! argument, [`open`] picks the schema once and hands back a boxed
//! [`RecordSource`]. Rows are still decoded through the statically typed
//! [`RowReader`]; only the per-row accessors go through the vtable.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::streaming::{ReaderOptions, RowReader};
use crate::error::{Error, Result};
use crate::schema::{
    Badge, Comment, Post, PostHistory, PostLink, RecordKind, RecordRef, Schema, Tag, User, Vote,
};

/// A decoding session with its record kind erased
pub trait RecordSource {
    fn kind(&self) -> RecordKind;

    /// See [`RowReader::advance`]
    fn advance(&mut self) -> bool;

    /// The current record, valid until the next advance
    fn record(&self) -> RecordRef<'_>;

    fn err(&self) -> Option<&Error>;

    fn take_err(&mut self) -> Option<Error>;

    fn rows_read(&self) -> u64;

    fn close(&mut self);
}

impl<R: Read, S: Schema> RecordSource for RowReader<R, S> {
    fn kind(&self) -> RecordKind {
        S::KIND
    }

    fn advance(&mut self) -> bool {
        RowReader::advance(self)
    }

    fn record(&self) -> RecordRef<'_> {
        RowReader::record(self).as_record()
    }

    fn err(&self) -> Option<&Error> {
        RowReader::err(self)
    }

    fn take_err(&mut self) -> Option<Error> {
        RowReader::take_err(self)
    }

    fn rows_read(&self) -> u64 {
        RowReader::rows_read(self)
    }

    fn close(&mut self) {
        RowReader::close(self)
    }
}

pub type BoxedSource<'a> = Box<dyn RecordSource + Send + 'a>;

/// Open a session of the given kind over any byte source
pub fn from_reader<'a, R>(
    kind: RecordKind,
    reader: R,
    options: ReaderOptions,
) -> Result<BoxedSource<'a>>
where
    R: Read + Send + 'a,
{
    fn boxed<'a, R: Read + Send + 'a, S: Schema + 'a>(
        reader: R,
        options: ReaderOptions,
    ) -> Result<BoxedSource<'a>> {
        Ok(Box::new(RowReader::<R, S>::with_options(reader, options)?))
    }

    match kind {
        RecordKind::Badges => boxed::<R, Badge>(reader, options),
        RecordKind::Comments => boxed::<R, Comment>(reader, options),
        RecordKind::PostHistory => boxed::<R, PostHistory>(reader, options),
        RecordKind::PostLinks => boxed::<R, PostLink>(reader, options),
        RecordKind::Posts => boxed::<R, Post>(reader, options),
        RecordKind::Tags => boxed::<R, Tag>(reader, options),
        RecordKind::Users => boxed::<R, User>(reader, options),
        RecordKind::Votes => boxed::<R, Vote>(reader, options),
    }
}

/// Open a dump file of the given kind
pub fn open(
    kind: RecordKind,
    path: impl AsRef<Path>,
    options: ReaderOptions,
) -> Result<BoxedSource<'static>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    from_reader(kind, file, options)
}
