//! [`Post`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select},
    DateTimeOf,
};
use futures::TryStreamExt as _;
use mongodb::bson::{self, doc};
use serde::{Deserialize, Serialize};
use tracerr::Traced;

use crate::{
    domain::{post, Post},
    infra::{database, Database},
};

use super::{Error, Mongo};

/// Stored representation of a [`Post`].
#[derive(Debug, Deserialize, Serialize)]
pub(super) struct Document {
    /// [`post::Id`] as a hyphenated UUID string.
    #[serde(rename = "_id")]
    id: String,

    /// [`post::Title`].
    title: Option<String>,

    /// [`post::Body`].
    body: Option<String>,

    /// [`post::Image`].
    image: Option<String>,

    /// [`post::Author`].
    author: Option<String>,

    /// [`post::PublicationDateTime`].
    date: bson::DateTime,
}

impl From<Post> for Document {
    fn from(post: Post) -> Self {
        let Post {
            id,
            title,
            body,
            image,
            author,
            date,
        } = post;
        Self {
            id: id.to_string(),
            title: title.map(Into::into),
            body: body.map(Into::into),
            image: image.map(Into::into),
            author: author.map(Into::into),
            date: bson::DateTime::from_millis(date.unix_timestamp_millis()),
        }
    }
}

impl TryFrom<Document> for Post {
    type Error = Error;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        let Document {
            id,
            title,
            body,
            image,
            author,
            date,
        } = doc;
        let millis = date.timestamp_millis();
        Ok(Self {
            id: id.parse()?,
            title: title.map(Into::into),
            body: body.map(Into::into),
            image: image.map(Into::into),
            author: author.map(Into::into),
            date: DateTimeOf::from_unix_timestamp_millis(millis)
                .ok_or(Error::DateOutOfRange(millis))?,
        })
    }
}

impl Database<Insert<Post>> for Mongo {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(post): Insert<Post>,
    ) -> Result<Self::Ok, Self::Err> {
        self.posts()
            .insert_one(Document::from(post))
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
            .map(drop)
    }
}

impl Database<Select<By<Option<Post>, post::Id>>> for Mongo {
    type Ok = Option<Post>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Post>, post::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.posts()
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?
            .map(Post::try_from)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl Database<Select<By<Vec<Post>, ()>>> for Mongo {
    type Ok = Vec<Post>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Post>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.posts()
            .find(doc! {})
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?
            .try_collect::<Vec<_>>()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<_, _>>()
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl Database<Delete<post::Id>> for Mongo {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<post::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.posts()
            .delete_one(doc! { "_id": id.to_string() })
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
            .map(|res| res.deleted_count > 0)
    }
}
