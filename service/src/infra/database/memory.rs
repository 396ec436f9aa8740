//! In-memory [`Database`] implementation.
//!
//! Keeps everything in the process memory, so the data is lost on restart.
//! Mirrors the semantics of the persistent back-ends, including the
//! uniqueness of [`User`] emails.

use std::sync::Arc;

use common::operations::{By, Delete, Insert, Select};
use derive_more::{Display, Error as StdError};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{post, user, Post, User},
    infra::{database, Database},
};

/// In-memory [`Database`].
///
/// Clones share the same underlying data.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<RwLock<Collections>>);

/// Collections of a [`Memory`] database, in insertion order.
#[derive(Debug, Default)]
struct Collections {
    /// Stored [`Post`]s.
    posts: Vec<Post>,

    /// Stored [`User`]s.
    users: Vec<User>,
}

/// [`Memory`] database error.
#[derive(Clone, Debug, Display, StdError)]
pub enum Error {
    /// [`User`] with the same [`user::Email`] is stored already.
    #[display("`User(email: {_0})` already exists")]
    DuplicateEmail(#[error(not(source))] user::Email),
}

impl Error {
    /// Checks whether this [`Error`] is a violation of a unique constraint.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::DuplicateEmail(_) => true,
        }
    }
}

impl Database<Insert<Post>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(post): Insert<Post>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.write().await.posts.push(post);
        Ok(())
    }
}

impl Database<Select<By<Option<Post>, post::Id>>> for Memory {
    type Ok = Option<Post>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Post>, post::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.read().await.posts.iter().find(|p| p.id == id).cloned())
    }
}

impl Database<Select<By<Vec<Post>, ()>>> for Memory {
    type Ok = Vec<Post>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Post>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.read().await.posts.clone())
    }
}

impl Database<Delete<post::Id>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<post::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut collections = self.0.write().await;
        let before = collections.posts.len();
        collections.posts.retain(|p| p.id != id);
        Ok(collections.posts.len() != before)
    }
}

impl Database<Insert<User>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut collections = self.0.write().await;
        if collections.users.iter().any(|u| u.email == user.email) {
            return Err(tracerr::new!(database::Error::from(
                Error::DuplicateEmail(user.email)
            )));
        }
        collections.users.push(user);
        Ok(())
    }
}

impl<'l> Database<Select<By<Option<User>, &'l user::Email>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .0
            .read()
            .await
            .users
            .iter()
            .find(|u| &u.email == email)
            .cloned())
    }
}
