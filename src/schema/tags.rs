//! Tags.xml rows

use super::convert::{flag, integer};
use super::{unknown_field, RecordKind, RecordRef, Schema};
use crate::error::FieldError;

/// A tag and how many questions carry it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub tag_name: String,
    pub count: i64,
    pub excerpt_post_id: i64,
    pub wiki_post_id: i64,
    pub is_moderator_only: bool,
    pub is_required: bool,
}

impl Schema for Tag {
    const KIND: RecordKind = RecordKind::Tags;

    fn decode_attr(&mut self, name: &str, value: String) -> Result<(), FieldError> {
        match name {
            "id" => self.id = integer("id", &value)?,
            "tagname" => self.tag_name = value,
            "count" => self.count = integer("count", &value)?,
            "excerptpostid" => self.excerpt_post_id = integer("excerptpostid", &value)?,
            "wikipostid" => self.wiki_post_id = integer("wikipostid", &value)?,
            "ismoderatoronly" => self.is_moderator_only = flag("ismoderatoronly", &value)?,
            "isrequired" => self.is_required = flag("isrequired", &value)?,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_record(&self) -> RecordRef<'_> {
        RecordRef::Tag(self)
    }
}
