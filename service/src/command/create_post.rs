//! [`Command`] for creating a new [`Post`].

use common::{operations::Insert, DateTime};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::post::{Author, Body, Image, Title};
use crate::{
    domain::{post, Post},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Post`].
#[derive(Clone, Debug, Default)]
pub struct CreatePost {
    /// [`Title`] of a new [`Post`].
    pub title: Option<post::Title>,

    /// [`Body`] of a new [`Post`].
    pub body: Option<post::Body>,

    /// [`Image`] of a new [`Post`].
    pub image: Option<post::Image>,

    /// [`Author`] of a new [`Post`].
    pub author: Option<post::Author>,

    /// [`DateTime`] a new [`Post`] is published at.
    ///
    /// [`DateTime::now()`] is used if not provided.
    pub date: Option<post::PublicationDateTime>,
}

impl<Db> Command<CreatePost> for Service<Db>
where
    Db: Database<Insert<Post>, Err = Traced<database::Error>>,
{
    type Ok = Post;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreatePost) -> Result<Self::Ok, Self::Err> {
        let CreatePost {
            title,
            body,
            image,
            author,
            date,
        } = cmd;

        let post = Post {
            id: post::Id::new(),
            title,
            body,
            image,
            author,
            date: date.unwrap_or_else(|| DateTime::now().coerce()),
        };

        self.database()
            .execute(Insert(post.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(post)
    }
}

/// Error of [`CreatePost`] [`Command`] execution.
pub type ExecutionError = database::Error;
