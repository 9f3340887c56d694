//! Record schemas
//!
//! One module per dump file. Each record type implements [`Schema`]: a
//! table from lower-cased attribute name to a typed conversion, with any
//! name outside the table rejected as an unknown field. A schema drift in a
//! newer dump therefore stops decoding instead of silently dropping data.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::attributes::Attribute;
use crate::error::FieldError;

pub mod badges;
pub mod comments;
pub mod convert;
pub mod post_history;
pub mod post_links;
pub mod posts;
pub mod tags;
pub mod users;
pub mod votes;

pub use badges::Badge;
pub use comments::Comment;
pub use post_history::{PostHistory, Voter};
pub use post_links::PostLink;
pub use posts::{Post, PostType};
pub use tags::Tag;
pub use users::User;
pub use votes::Vote;

/// Element name shared by every record row
pub const ROW: &str = "row";

/// The eight dump files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Badges,
    Comments,
    PostHistory,
    PostLinks,
    Posts,
    Tags,
    Users,
    Votes,
}

impl RecordKind {
    pub const ALL: [RecordKind; 8] = [
        RecordKind::Badges,
        RecordKind::Comments,
        RecordKind::PostHistory,
        RecordKind::PostLinks,
        RecordKind::Posts,
        RecordKind::Tags,
        RecordKind::Users,
        RecordKind::Votes,
    ];

    /// Name of the outermost element, compared case-insensitively
    pub fn wrapper_name(self) -> &'static str {
        match self {
            RecordKind::Badges => "badges",
            RecordKind::Comments => "comments",
            RecordKind::PostHistory => "posthistory",
            RecordKind::PostLinks => "postlinks",
            RecordKind::Posts => "posts",
            RecordKind::Tags => "tags",
            RecordKind::Users => "users",
            RecordKind::Votes => "votes",
        }
    }

    /// Conventional file name inside a dump directory
    pub fn file_name(self) -> &'static str {
        match self {
            RecordKind::Badges => "Badges.xml",
            RecordKind::Comments => "Comments.xml",
            RecordKind::PostHistory => "PostHistory.xml",
            RecordKind::PostLinks => "PostLinks.xml",
            RecordKind::Posts => "Posts.xml",
            RecordKind::Tags => "Tags.xml",
            RecordKind::Users => "Users.xml",
            RecordKind::Votes => "Votes.xml",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wrapper_name())
    }
}

/// Error for a string that names no record kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown record kind '{0}'")]
pub struct ParseKindError(pub String);

impl FromStr for RecordKind {
    type Err = ParseKindError;

    /// Accepts a wrapper name or a file name, in any case: `posts`, `Posts.xml`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stem = match s.len().checked_sub(4) {
            Some(cut) if s.is_char_boundary(cut) && s[cut..].eq_ignore_ascii_case(".xml") => {
                &s[..cut]
            }
            _ => s,
        };
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.wrapper_name().eq_ignore_ascii_case(stem))
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

/// A record type decodable from one row element
pub trait Schema: Default + Clone + fmt::Debug + Send {
    /// The dump file this record comes from
    const KIND: RecordKind;

    /// Decode one attribute; `name` is already lower-cased
    fn decode_attr(&mut self, name: &str, value: String) -> Result<(), FieldError>;

    /// Compute fields derived from other fields once all attributes are in
    fn finish(&mut self) -> Result<(), FieldError> {
        Ok(())
    }

    /// Borrow as the kind-tagged view
    fn as_record(&self) -> RecordRef<'_>;
}

/// Decode a row's attributes into a reused record buffer
///
/// The buffer is reset to its default first: rows are sparse, and a field
/// the previous row set must not leak into a row that omits it.
pub fn decode_row<S: Schema>(attributes: Vec<Attribute>, record: &mut S) -> Result<(), FieldError> {
    *record = S::default();
    for Attribute { mut name, value } in attributes {
        name.make_ascii_lowercase();
        record.decode_attr(&name, value)?;
    }
    record.finish()
}

pub(crate) fn unknown_field(kind: RecordKind, name: &str) -> FieldError {
    FieldError::UnknownField {
        kind,
        name: name.to_string(),
    }
}

/// An owned record of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Badge(Badge),
    Comment(Comment),
    PostHistory(PostHistory),
    PostLink(PostLink),
    Post(Post),
    Tag(Tag),
    User(User),
    Vote(Vote),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        self.view().kind()
    }

    pub fn view(&self) -> RecordRef<'_> {
        match self {
            Record::Badge(r) => RecordRef::Badge(r),
            Record::Comment(r) => RecordRef::Comment(r),
            Record::PostHistory(r) => RecordRef::PostHistory(r),
            Record::PostLink(r) => RecordRef::PostLink(r),
            Record::Post(r) => RecordRef::Post(r),
            Record::Tag(r) => RecordRef::Tag(r),
            Record::User(r) => RecordRef::User(r),
            Record::Vote(r) => RecordRef::Vote(r),
        }
    }
}

/// A borrowed record of any kind, valid until the session advances
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordRef<'a> {
    Badge(&'a Badge),
    Comment(&'a Comment),
    PostHistory(&'a PostHistory),
    PostLink(&'a PostLink),
    Post(&'a Post),
    Tag(&'a Tag),
    User(&'a User),
    Vote(&'a Vote),
}

impl RecordRef<'_> {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordRef::Badge(_) => RecordKind::Badges,
            RecordRef::Comment(_) => RecordKind::Comments,
            RecordRef::PostHistory(_) => RecordKind::PostHistory,
            RecordRef::PostLink(_) => RecordKind::PostLinks,
            RecordRef::Post(_) => RecordKind::Posts,
            RecordRef::Tag(_) => RecordKind::Tags,
            RecordRef::User(_) => RecordKind::Users,
            RecordRef::Vote(_) => RecordKind::Votes,
        }
    }

    /// The row's `Id` attribute
    pub fn id(&self) -> i64 {
        match self {
            RecordRef::Badge(r) => r.id,
            RecordRef::Comment(r) => r.id,
            RecordRef::PostHistory(r) => r.id,
            RecordRef::PostLink(r) => r.id,
            RecordRef::Post(r) => r.id,
            RecordRef::Tag(r) => r.id,
            RecordRef::User(r) => r.id,
            RecordRef::Vote(r) => r.id,
        }
    }

    /// Clone into an owned record, for use past the next advance
    pub fn to_record(&self) -> Record {
        match *self {
            RecordRef::Badge(r) => Record::Badge(r.clone()),
            RecordRef::Comment(r) => Record::Comment(r.clone()),
            RecordRef::PostHistory(r) => Record::PostHistory(r.clone()),
            RecordRef::PostLink(r) => Record::PostLink(r.clone()),
            RecordRef::Post(r) => Record::Post(r.clone()),
            RecordRef::Tag(r) => Record::Tag(r.clone()),
            RecordRef::User(r) => Record::User(r.clone()),
            RecordRef::Vote(r) => Record::Vote(r.clone()),
        }
    }
}

#[cfg(test)]
pub(crate) fn decode_pairs<S: Schema>(pairs: &[(&str, &str)]) -> Result<S, FieldError> {
    let mut record = S::default();
    let attributes = pairs.iter().map(|(n, v)| Attribute::new(*n, *v)).collect();
    decode_row(attributes, &mut record)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("posts".parse(), Ok(RecordKind::Posts));
        assert_eq!("PostHistory.xml".parse(), Ok(RecordKind::PostHistory));
        assert_eq!("VOTES".parse(), Ok(RecordKind::Votes));
        assert!("Posts.json".parse::<RecordKind>().is_err());
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in RecordKind::ALL {
            assert_eq!(kind.file_name().parse(), Ok(kind));
            assert_eq!(kind.to_string(), kind.wrapper_name());
        }
    }

    #[test]
    fn test_reset_before_decode() {
        let mut tag = Tag::default();
        let first = vec![Attribute::new("Id", "1"), Attribute::new("TagName", "foo")];
        decode_row(first, &mut tag).unwrap();
        assert_eq!(tag.tag_name, "foo");

        decode_row(vec![Attribute::new("Id", "2")], &mut tag).unwrap();
        assert_eq!(tag.id, 2);
        assert_eq!(tag.tag_name, "");
    }

    #[test]
    fn test_attribute_names_case_insensitive() {
        let vote: Vote = decode_pairs(&[("ID", "5"), ("postId", "9")]).unwrap();
        assert_eq!((vote.id, vote.post_id), (5, 9));
    }

    #[test]
    fn test_record_ref_round_trip() {
        let badge = Badge {
            id: 4,
            name: "Teacher".to_string(),
            ..Badge::default()
        };
        let record = badge.as_record().to_record();
        assert_eq!(record.kind(), RecordKind::Badges);
        assert_eq!(record.view().id(), 4);
        assert_eq!(record, Record::Badge(badge));
    }
}
