//! Users.xml rows

use chrono::NaiveDateTime;

use super::convert::{integer, timestamp};
use super::{unknown_field, RecordKind, RecordRef, Schema};
use crate::error::FieldError;

/// A user profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub reputation: i64,
    pub creation_date: Option<NaiveDateTime>,
    pub display_name: String,
    pub last_access_date: Option<NaiveDateTime>,
    pub website_url: String,
    pub location: String,
    /// Profile text, HTML
    pub about_me: String,
    pub views: i64,
    pub up_votes: i64,
    pub down_votes: i64,
    pub age: i64,
    /// Network-wide account id
    pub account_id: i64,
    pub profile_image_url: String,
    pub email_hash: String,
}

impl Schema for User {
    const KIND: RecordKind = RecordKind::Users;

    fn decode_attr(&mut self, name: &str, value: String) -> Result<(), FieldError> {
        match name {
            "id" => self.id = integer("id", &value)?,
            "reputation" => self.reputation = integer("reputation", &value)?,
            "creationdate" => self.creation_date = timestamp("creationdate", &value)?,
            "displayname" => self.display_name = value,
            "lastaccessdate" => self.last_access_date = timestamp("lastaccessdate", &value)?,
            "websiteurl" => self.website_url = value,
            "location" => self.location = value,
            "aboutme" => self.about_me = value,
            "views" => self.views = integer("views", &value)?,
            "upvotes" => self.up_votes = integer("upvotes", &value)?,
            "downvotes" => self.down_votes = integer("downvotes", &value)?,
            "age" => self.age = integer("age", &value)?,
            "accountid" => self.account_id = integer("accountid", &value)?,
            "profileimageurl" => self.profile_image_url = value,
            "emailhash" => self.email_hash = value,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_record(&self) -> RecordRef<'_> {
        RecordRef::User(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::decode_pairs;

    #[test]
    fn test_decode_user() {
        let user: User = decode_pairs(&[
            ("Id", "-1"),
            ("Reputation", "1"),
            ("CreationDate", "2008-07-31T00:00:00.000"),
            ("DisplayName", "Community"),
            ("WebsiteUrl", "http://meta.stackexchange.com/"),
            ("Location", "on the server farm"),
            ("AboutMe", "<p>Hi, I'm not really a person.</p>"),
            ("Views", "649"),
            ("UpVotes", "506539"),
            ("DownVotes", "1323711"),
            ("AccountId", "-1"),
        ])
        .unwrap();
        assert_eq!(user.id, -1);
        assert_eq!(user.display_name, "Community");
        assert_eq!(user.down_votes, 1323711);
        assert_eq!(user.age, 0);
        assert_eq!(user.last_access_date, None);
        assert_eq!(user.profile_image_url, "");
    }

    #[test]
    fn test_unknown_user_field() {
        let err = decode_pairs::<User>(&[("Id", "1"), ("Karma", "3")]).unwrap_err();
        assert_eq!(err.to_string(), "unknown users field: 'karma'");
    }
}
