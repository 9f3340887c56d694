//! PostHistory.xml rows
//!
//! `text` means different things depending on `post_history_type_id`: the
//! new body or title for edits, the new tag list for tag edits, and a JSON
//! document naming the voters for close and reopen events. The last two
//! are decoded into derived fields.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::convert::{integer, json, packed_list, timestamp};
use super::{unknown_field, RecordKind, RecordRef, Schema};
use crate::error::FieldError;

/// Values of `PostHistory::post_history_type_id`
pub mod history_type {
    pub const INITIAL_TITLE: i64 = 1;
    pub const INITIAL_BODY: i64 = 2;
    pub const INITIAL_TAGS: i64 = 3;
    pub const EDIT_TITLE: i64 = 4;
    pub const EDIT_BODY: i64 = 5;
    pub const EDIT_TAGS: i64 = 6;
    pub const ROLLBACK_TITLE: i64 = 7;
    pub const ROLLBACK_BODY: i64 = 8;
    pub const ROLLBACK_TAGS: i64 = 9;
    pub const POST_CLOSED: i64 = 10;
    pub const POST_REOPENED: i64 = 11;
}

use history_type::*;

/// One revision or moderation event of a post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostHistory {
    pub id: i64,
    pub post_history_type_id: i64,
    pub post_id: i64,
    /// Shared by events recorded in the same action
    pub revision_guid: String,
    pub creation_date: Option<NaiveDateTime>,
    pub user_id: i64,
    pub user_display_name: String,
    pub text: String,
    pub comment: String,
    pub content_license: String,
    /// Tag list of a tag revision (`text` decoded as a packed list)
    pub tags: Vec<String>,
    /// Voters of a close or reopen event (`text` decoded as JSON)
    pub close_voters: Vec<Voter>,
}

/// A user who voted to close or reopen a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Voter {
    pub id: i64,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Deserialize)]
struct CloseVotes {
    #[serde(rename = "Voters", default)]
    voters: Vec<Voter>,
}

impl PostHistory {
    /// Whether this revision changed the tag list
    pub fn is_tag_revision(&self) -> bool {
        matches!(self.post_history_type_id, INITIAL_TAGS | EDIT_TAGS | ROLLBACK_TAGS)
    }

    pub fn is_close_event(&self) -> bool {
        matches!(self.post_history_type_id, POST_CLOSED | POST_REOPENED)
    }
}

impl Schema for PostHistory {
    const KIND: RecordKind = RecordKind::PostHistory;

    fn decode_attr(&mut self, name: &str, value: String) -> Result<(), FieldError> {
        match name {
            "id" => self.id = integer("id", &value)?,
            "posthistorytypeid" => {
                self.post_history_type_id = integer("posthistorytypeid", &value)?
            }
            "postid" => self.post_id = integer("postid", &value)?,
            "revisionguid" => self.revision_guid = value,
            "creationdate" => self.creation_date = timestamp("creationdate", &value)?,
            "userid" => self.user_id = integer("userid", &value)?,
            "userdisplayname" => self.user_display_name = value,
            "text" => self.text = value,
            "comment" => self.comment = value,
            "contentlicense" => self.content_license = value,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FieldError> {
        if self.is_tag_revision() {
            self.tags = packed_list(&self.text);
        } else if self.is_close_event() && self.text.trim_start().starts_with('{') {
            // Older dumps store a close-reason id here instead of JSON
            self.close_voters = json::<CloseVotes>("text", &self.text)?.voters;
        }
        Ok(())
    }

    fn as_record(&self) -> RecordRef<'_> {
        RecordRef::PostHistory(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::decode_pairs;

    #[test]
    fn test_tag_revision_derives_tags() {
        for type_id in ["3", "6", "9"] {
            let h: PostHistory = decode_pairs(&[
                ("PostHistoryTypeId", type_id),
                ("Text", "<rust><xml>"),
            ])
            .unwrap();
            assert_eq!(h.tags, ["rust", "xml"]);
            assert_eq!(h.text, "<rust><xml>");
        }
    }

    #[test]
    fn test_body_revision_keeps_text_verbatim() {
        let h: PostHistory = decode_pairs(&[
            ("Id", "10"),
            ("PostHistoryTypeId", "2"),
            ("RevisionGUID", "0d1ac9ee-8c3e-4b5c-8b88-d8b4f4c2e3f1"),
            ("Text", "<b><i>"),
        ])
        .unwrap();
        assert!(h.tags.is_empty());
        assert_eq!(h.text, "<b><i>");
    }

    #[test]
    fn test_type_after_text_still_derives() {
        let h: PostHistory =
            decode_pairs(&[("Text", "<a><b>"), ("PostHistoryTypeId", "6")]).unwrap();
        assert_eq!(h.tags, ["a", "b"]);
    }

    #[test]
    fn test_close_event_voters() {
        let h: PostHistory = decode_pairs(&[
            ("PostHistoryTypeId", "10"),
            ("Comment", "101"),
            (
                "Text",
                r#"{"OriginalQuestionIds":[123],"Voters":[{"Id":17,"DisplayName":"alice"},{"Id":42,"DisplayName":"bob","BindingReason":{"GoldTagBadge":"rust"}}]}"#,
            ),
        ])
        .unwrap();
        assert_eq!(
            h.close_voters,
            [
                Voter { id: 17, display_name: "alice".to_string() },
                Voter { id: 42, display_name: "bob".to_string() },
            ]
        );
        assert!(h.tags.is_empty());
    }

    #[test]
    fn test_close_event_legacy_reason() {
        let h: PostHistory = decode_pairs(&[("PostHistoryTypeId", "10"), ("Text", "1")]).unwrap();
        assert!(h.close_voters.is_empty());
        assert_eq!(h.text, "1");
    }

    #[test]
    fn test_close_event_bad_json() {
        let pairs = [("PostHistoryTypeId", "11"), ("Text", "{\"Voters\":")];
        let err = decode_pairs::<PostHistory>(&pairs).unwrap_err();
        assert!(matches!(err, FieldError::InvalidJson { field: "text", .. }));
    }

    #[test]
    fn test_tags_attribute_is_unknown() {
        let err = decode_pairs::<PostHistory>(&[("Tags", "<a>")]).unwrap_err();
        assert!(matches!(err, FieldError::UnknownField { .. }));
    }
}
