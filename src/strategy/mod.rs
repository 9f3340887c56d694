//! Decoding strategies
//!
//! - Streaming: one typed session per file, rows pulled on demand
//! - Any: the same session with the record kind picked at run time
//! - Parallel: independent sessions over several files on a Rayon pool

pub mod any;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod streaming;

pub use any::{BoxedSource, RecordSource};
pub use streaming::{ReaderOptions, Records, RowReader, SessionState};
