//! stackdump - streaming decoder for Stack Exchange data dumps
//!
//! Each dump file (`Posts.xml`, `Users.xml`, ...) is one wrapper element
//! holding a flat sequence of `<row>` elements whose attributes are the
//! record's fields. A [`RowReader`] pulls rows one at a time into a typed
//! record, so files of any size decode in bounded memory.
//!
//! ```no_run
//! use stackdump::strategy::streaming::open_posts;
//!
//! let mut posts = open_posts("dump/Posts.xml")?;
//! while posts.advance() {
//!     let post = posts.record();
//!     println!("{} {:?}", post.id, post.tags);
//! }
//! if let Some(err) = posts.err() {
//!     eprintln!("stopped early: {err}");
//! }
//! # Ok::<(), stackdump::Error>(())
//! ```
//!
//! Layers:
//! - `core`: pull tokenizer over a buffered byte source
//! - [`reader`]: byte buffer and the filtered event stream
//! - [`schema`]: record types and attribute conversions
//! - [`strategy`]: the row decoder, run-time dispatch, parallel driver

mod core;
pub mod error;
pub mod reader;
pub mod schema;
pub mod strategy;

pub use crate::core::attributes::Attribute;
pub use error::{Error, FieldError, Result, XmlError, XmlErrorKind};
pub use schema::{
    Badge, Comment, Post, PostHistory, PostLink, PostType, Record, RecordKind, RecordRef, Schema,
    Tag, User, Vote, Voter,
};
pub use strategy::streaming::{
    open_badges, open_comments, open_post_history, open_post_links, open_posts, open_tags,
    open_users, open_votes,
};
pub use strategy::{ReaderOptions, RecordSource, RowReader, SessionState};
