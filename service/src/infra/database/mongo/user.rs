//! [`User`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select},
    DateTimeOf,
};
use mongodb::bson::{self, doc};
use serde::{Deserialize, Serialize};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, Database},
};

use super::{Error, Mongo};

/// Stored representation of a [`User`].
#[derive(Debug, Deserialize, Serialize)]
pub(super) struct Document {
    /// [`user::Id`] as a hyphenated UUID string.
    #[serde(rename = "_id")]
    id: String,

    /// [`user::Email`].
    email: String,

    /// [`user::PasswordHash`].
    password: String,

    /// [`user::CreationDateTime`].
    created_at: bson::DateTime,
}

impl From<User> for Document {
    fn from(user: User) -> Self {
        let User {
            id,
            email,
            password_hash,
            created_at,
        } = user;
        Self {
            id: id.to_string(),
            email: email.into(),
            password: password_hash.to_string(),
            created_at: bson::DateTime::from_millis(
                created_at.unix_timestamp_millis(),
            ),
        }
    }
}

impl TryFrom<Document> for User {
    type Error = Error;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        let Document {
            id,
            email,
            password,
            created_at,
        } = doc;
        let millis = created_at.timestamp_millis();
        #[expect(unsafe_code, reason = "stored hashes are produced by us")]
        let password_hash = unsafe { user::PasswordHash::new_unchecked(password) };
        Ok(Self {
            id: id.parse()?,
            email: email.into(),
            password_hash,
            created_at: DateTimeOf::from_unix_timestamp_millis(millis)
                .ok_or(Error::DateOutOfRange(millis))?,
        })
    }
}

impl Database<Insert<User>> for Mongo {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        self.users()
            .insert_one(Document::from(user))
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
            .map(drop)
    }
}

impl<'l> Database<Select<By<Option<User>, &'l user::Email>>> for Mongo {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email: &str = by.into_inner().as_ref();
        self.users()
            .find_one(doc! { "email": email })
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?
            .map(User::try_from)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}
