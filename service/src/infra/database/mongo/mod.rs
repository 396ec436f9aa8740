//! [MongoDB] [`Database`] implementation.
//!
//! [MongoDB]: https://www.mongodb.com

mod post;
mod user;

use derive_more::{Display, Error as StdError, From};
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Collection, IndexModel,
};
use tracerr::Traced;
use tracing as log;

use crate::infra::database;
#[cfg(doc)]
use crate::{
    domain::{Post, User},
    infra::Database,
};

/// [`Mongo`] connection configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [Connection string] of the [MongoDB] deployment.
    ///
    /// [Connection string]: https://www.mongodb.com/docs/manual/reference/connection-string
    /// [MongoDB]: https://www.mongodb.com
    pub uri: String,

    /// Name of the database holding the collections.
    pub database: String,
}

/// [MongoDB] [`Database`] client.
///
/// [MongoDB]: https://www.mongodb.com
#[derive(Clone, Debug)]
pub struct Mongo {
    /// Database holding the collections.
    database: mongodb::Database,
}

impl Mongo {
    /// Name of the collection storing [`Post`]s.
    pub const POSTS: &'static str = "posts";

    /// Name of the collection storing [`User`]s.
    pub const USERS: &'static str = "users";

    /// Connects to the [MongoDB] deployment described by the provided
    /// [`Config`] and ensures the [`User`] email uniqueness index exists.
    ///
    /// # Errors
    ///
    /// If failed to connect to the deployment or to create the index.
    ///
    /// [MongoDB]: https://www.mongodb.com
    pub async fn connect(
        conf: &Config,
    ) -> Result<Self, Traced<database::Error>> {
        let client = Client::with_uri_str(&conf.uri)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        let database = client.database(&conf.database);

        drop(
            database
                .run_command(doc! { "ping": 1 })
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)?,
        );

        let this = Self { database };
        drop(
            this.users()
                .create_index(
                    IndexModel::builder()
                        .keys(doc! { "email": 1 })
                        .options(IndexOptions::builder().unique(true).build())
                        .build(),
                )
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)?,
        );

        log::info!("connected to `{}` MongoDB database", conf.database);

        Ok(this)
    }

    /// Returns the [`Collection`] of [`Post`] documents.
    fn posts(&self) -> Collection<post::Document> {
        self.database.collection(Self::POSTS)
    }

    /// Returns the [`Collection`] of [`User`] documents.
    fn users(&self) -> Collection<user::Document> {
        self.database.collection(Self::USERS)
    }
}

/// [`Mongo`] database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`mongodb`] driver error.
    #[display("MongoDB driver error: {_0}")]
    Driver(mongodb::error::Error),

    /// Stored document has an identifier not being a UUID.
    #[display("Malformed document ID: {_0}")]
    MalformedId(uuid::Error),

    /// Stored document has a date out of the supported range.
    #[display("Document date is out of range: {_0}ms")]
    #[from(ignore)]
    DateOutOfRange(#[error(not(source))] i64),
}

impl Error {
    /// [Error code] of a duplicate key write.
    ///
    /// [Error code]: https://www.mongodb.com/docs/manual/reference/error-codes
    const DUPLICATE_KEY: i32 = 11000;

    /// Checks whether this [`Error`] is a violation of a unique index.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Driver(e) => matches!(
                e.kind.as_ref(),
                ErrorKind::Write(WriteFailure::WriteError(w))
                    if w.code == Self::DUPLICATE_KEY
            ),
            Self::MalformedId(_) | Self::DateOutOfRange(_) => false,
        }
    }
}
