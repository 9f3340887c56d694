//! Votes.xml rows

use chrono::NaiveDateTime;

use super::convert::{integer, timestamp};
use super::{unknown_field, RecordKind, RecordRef, Schema};
use crate::error::FieldError;

/// A vote cast on a post
///
/// `user_id` is only present for favorites and bounty votes; the dump
/// anonymizes everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vote {
    pub id: i64,
    pub post_id: i64,
    pub vote_type_id: i64,
    pub user_id: i64,
    pub bounty_amount: i64,
    pub creation_date: Option<NaiveDateTime>,
}

impl Schema for Vote {
    const KIND: RecordKind = RecordKind::Votes;

    fn decode_attr(&mut self, name: &str, value: String) -> Result<(), FieldError> {
        match name {
            "id" => self.id = integer("id", &value)?,
            "postid" => self.post_id = integer("postid", &value)?,
            "votetypeid" => self.vote_type_id = integer("votetypeid", &value)?,
            "userid" => self.user_id = integer("userid", &value)?,
            "bountyamount" => self.bounty_amount = integer("bountyamount", &value)?,
            "creationdate" => self.creation_date = timestamp("creationdate", &value)?,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_record(&self) -> RecordRef<'_> {
        RecordRef::Vote(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::decode_pairs;

    #[test]
    fn test_decode_vote() {
        let vote: Vote = decode_pairs(&[
            ("Id", "1"),
            ("PostId", "1"),
            ("VoteTypeId", "2"),
            ("CreationDate", "2008-07-31T00:00:00.000"),
        ])
        .unwrap();
        assert_eq!(vote.vote_type_id, 2);
        assert_eq!(vote.user_id, 0);
        assert_eq!(vote.bounty_amount, 0);
    }
}
