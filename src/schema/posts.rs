//! Posts.xml rows
//!
//! Questions and answers share one file; `post_type_id` tells them apart,
//! and `parent_id` links an answer to its question.

use chrono::NaiveDateTime;

use super::convert::{integer, packed_list, timestamp};
use super::{unknown_field, RecordKind, RecordRef, Schema};
use crate::error::FieldError;

/// Known values of `Post::post_type_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostType {
    Question = 1,
    Answer = 2,
    OrphanedTagWiki = 3,
    TagWikiExcerpt = 4,
    TagWiki = 5,
    ModeratorNomination = 6,
    WikiPlaceholder = 7,
    PrivilegeWiki = 8,
}

impl PostType {
    pub fn from_id(id: i64) -> Option<Self> {
        Some(match id {
            1 => PostType::Question,
            2 => PostType::Answer,
            3 => PostType::OrphanedTagWiki,
            4 => PostType::TagWikiExcerpt,
            5 => PostType::TagWiki,
            6 => PostType::ModeratorNomination,
            7 => PostType::WikiPlaceholder,
            8 => PostType::PrivilegeWiki,
            _ => return None,
        })
    }
}

/// A question, answer or wiki post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub post_type_id: i64,
    /// Question id, for answers
    pub parent_id: i64,
    pub accepted_answer_id: i64,
    pub creation_date: Option<NaiveDateTime>,
    pub deletion_date: Option<NaiveDateTime>,
    pub score: i64,
    pub view_count: i64,
    /// HTML body
    pub body: String,
    pub owner_user_id: i64,
    pub owner_display_name: String,
    pub last_editor_user_id: i64,
    pub last_editor_display_name: String,
    pub last_edit_date: Option<NaiveDateTime>,
    pub last_activity_date: Option<NaiveDateTime>,
    pub title: String,
    pub tags: Vec<String>,
    pub answer_count: i64,
    pub comment_count: i64,
    pub favorite_count: i64,
    pub community_owned_date: Option<NaiveDateTime>,
    pub closed_date: Option<NaiveDateTime>,
    pub content_license: String,
}

impl Post {
    pub fn post_type(&self) -> Option<PostType> {
        PostType::from_id(self.post_type_id)
    }

    pub fn is_question(&self) -> bool {
        self.post_type() == Some(PostType::Question)
    }

    pub fn is_answer(&self) -> bool {
        self.post_type() == Some(PostType::Answer)
    }
}

impl Schema for Post {
    const KIND: RecordKind = RecordKind::Posts;

    fn decode_attr(&mut self, name: &str, value: String) -> Result<(), FieldError> {
        match name {
            "id" => self.id = integer("id", &value)?,
            "posttypeid" => self.post_type_id = integer("posttypeid", &value)?,
            "parentid" => self.parent_id = integer("parentid", &value)?,
            "acceptedanswerid" => self.accepted_answer_id = integer("acceptedanswerid", &value)?,
            "creationdate" => self.creation_date = timestamp("creationdate", &value)?,
            "deletiondate" => self.deletion_date = timestamp("deletiondate", &value)?,
            "score" => self.score = integer("score", &value)?,
            "viewcount" => self.view_count = integer("viewcount", &value)?,
            "body" => self.body = value,
            "owneruserid" => self.owner_user_id = integer("owneruserid", &value)?,
            "ownerdisplayname" => self.owner_display_name = value,
            "lasteditoruserid" => self.last_editor_user_id = integer("lasteditoruserid", &value)?,
            "lasteditordisplayname" => self.last_editor_display_name = value,
            "lasteditdate" => self.last_edit_date = timestamp("lasteditdate", &value)?,
            "lastactivitydate" => self.last_activity_date = timestamp("lastactivitydate", &value)?,
            "title" => self.title = value,
            "tags" => self.tags = packed_list(&value),
            "answercount" => self.answer_count = integer("answercount", &value)?,
            "commentcount" => self.comment_count = integer("commentcount", &value)?,
            "favoritecount" => self.favorite_count = integer("favoritecount", &value)?,
            "communityowneddate" => {
                self.community_owned_date = timestamp("communityowneddate", &value)?
            }
            "closeddate" => self.closed_date = timestamp("closeddate", &value)?,
            "contentlicense" => self.content_license = value,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_record(&self) -> RecordRef<'_> {
        RecordRef::Post(self)
    }
}
