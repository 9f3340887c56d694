//! Parallel dump decoding
//!
//! Uses Rayon to run one independent session per file. Sessions share
//! nothing; the visitor sees records from several files interleaved and
//! must be `Sync`.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::debug;

use super::any::open;
use super::streaming::ReaderOptions;
use crate::error::Error;
use crate::schema::{RecordKind, RecordRef};

/// Outcome of decoding one file
#[derive(Debug)]
pub struct FileSummary {
    pub kind: RecordKind,
    pub path: PathBuf,
    /// Rows decoded before the session ended
    pub rows: u64,
    /// Why the session ended early, if it did
    pub error: Option<Error>,
}

impl FileSummary {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Decode several dump files in parallel, calling `visitor` for every row
///
/// Summaries are returned in the order of `jobs`.
pub fn decode_files<F>(
    jobs: &[(RecordKind, PathBuf)],
    options: ReaderOptions,
    visitor: F,
) -> Vec<FileSummary>
where
    F: Fn(RecordRef<'_>) + Sync,
{
    debug!(files = jobs.len(), "decoding dump files in parallel");
    jobs.par_iter()
        .map(|(kind, path)| {
            let mut summary = FileSummary {
                kind: *kind,
                path: path.clone(),
                rows: 0,
                error: None,
            };
            match open(*kind, path, options) {
                Ok(mut source) => {
                    while source.advance() {
                        visitor(source.record());
                    }
                    summary.rows = source.rows_read();
                    summary.error = source.take_err();
                }
                Err(e) => summary.error = Some(e),
            }
            summary
        })
        .collect()
}

/// Decode every known file found in a dump directory
///
/// Kinds whose file is missing are skipped.
pub fn decode_dir<F>(
    dir: impl Into<PathBuf>,
    options: ReaderOptions,
    visitor: F,
) -> Vec<FileSummary>
where
    F: Fn(RecordRef<'_>) + Sync,
{
    let dir = dir.into();
    let jobs: Vec<_> = RecordKind::ALL
        .into_iter()
        .map(|kind| (kind, dir.join(kind.file_name())))
        .filter(|(_, path)| path.is_file())
        .collect();
    decode_files(&jobs, options, visitor)
}
