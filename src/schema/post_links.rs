//! PostLinks.xml rows

use chrono::NaiveDateTime;

use super::convert::{integer, timestamp};
use super::{unknown_field, RecordKind, RecordRef, Schema};
use crate::error::FieldError;

/// Link type: the related post is linked from the body
pub const LINKED: i64 = 1;
/// Link type: the post is a duplicate of the related post
pub const DUPLICATE: i64 = 3;

/// A link between two posts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostLink {
    pub id: i64,
    pub creation_date: Option<NaiveDateTime>,
    pub post_id: i64,
    pub related_post_id: i64,
    pub link_type_id: i64,
}

impl PostLink {
    pub fn is_duplicate(&self) -> bool {
        self.link_type_id == DUPLICATE
    }
}

impl Schema for PostLink {
    const KIND: RecordKind = RecordKind::PostLinks;

    fn decode_attr(&mut self, name: &str, value: String) -> Result<(), FieldError> {
        match name {
            "id" => self.id = integer("id", &value)?,
            "creationdate" => self.creation_date = timestamp("creationdate", &value)?,
            "postid" => self.post_id = integer("postid", &value)?,
            "relatedpostid" => self.related_post_id = integer("relatedpostid", &value)?,
            "linktypeid" => self.link_type_id = integer("linktypeid", &value)?,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_record(&self) -> RecordRef<'_> {
        RecordRef::PostLink(self)
    }
}
