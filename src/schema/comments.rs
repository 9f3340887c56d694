//! Comments.xml rows

use chrono::NaiveDateTime;

use super::convert::{integer, timestamp};
use super::{unknown_field, RecordKind, RecordRef, Schema};
use crate::error::FieldError;

/// A comment on a post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub score: i64,
    pub text: String,
    pub creation_date: Option<NaiveDateTime>,
    pub user_id: i64,
    /// Set instead of `user_id` for deleted users
    pub user_display_name: String,
    pub content_license: String,
}

impl Schema for Comment {
    const KIND: RecordKind = RecordKind::Comments;

    fn decode_attr(&mut self, name: &str, value: String) -> Result<(), FieldError> {
        match name {
            "id" => self.id = integer("id", &value)?,
            "postid" => self.post_id = integer("postid", &value)?,
            "score" => self.score = integer("score", &value)?,
            "text" => self.text = value,
            "creationdate" => self.creation_date = timestamp("creationdate", &value)?,
            "userid" => self.user_id = integer("userid", &value)?,
            "userdisplayname" => self.user_display_name = value,
            "contentlicense" => self.content_license = value,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_record(&self) -> RecordRef<'_> {
        RecordRef::Comment(self)
    }
}
