//! Badges.xml rows

use chrono::NaiveDateTime;

use super::convert::{flag, integer, timestamp};
use super::{unknown_field, RecordKind, RecordRef, Schema};
use crate::error::FieldError;

/// A badge awarded to a user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Badge {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub date: Option<NaiveDateTime>,
    /// 1 = gold, 2 = silver, 3 = bronze
    pub class: i64,
    /// Whether `name` is a tag name rather than a named badge
    pub tag_based: bool,
}

impl Schema for Badge {
    const KIND: RecordKind = RecordKind::Badges;

    fn decode_attr(&mut self, name: &str, value: String) -> Result<(), FieldError> {
        match name {
            "id" => self.id = integer("id", &value)?,
            "userid" => self.user_id = integer("userid", &value)?,
            "name" => self.name = value,
            "date" => self.date = timestamp("date", &value)?,
            "class" => self.class = integer("class", &value)?,
            "tagbased" => self.tag_based = flag("tagbased", &value)?,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_record(&self) -> RecordRef<'_> {
        RecordRef::Badge(self)
    }
}
