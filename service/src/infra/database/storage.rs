//! [`Storage`] definitions.

use derive_more::From;
use tracerr::Traced;

#[cfg(feature = "mongodb")]
use super::Mongo;
use super::{Database, Error, Memory};

/// [`Database`] chosen at runtime.
#[derive(Clone, Debug, From)]
pub enum Storage {
    /// [`Mongo`] database.
    #[cfg(feature = "mongodb")]
    Mongo(Mongo),

    /// [`Memory`] database.
    Memory(Memory),
}

#[cfg(feature = "mongodb")]
impl<Op> Database<Op> for Storage
where
    Mongo: Database<Op, Err = Traced<Error>>,
    Memory: Database<
        Op,
        Ok = <Mongo as Database<Op>>::Ok,
        Err = Traced<Error>,
    >,
{
    type Ok = <Mongo as Database<Op>>::Ok;
    type Err = Traced<Error>;

    async fn execute(&self, op: Op) -> Result<Self::Ok, Self::Err> {
        match self {
            Self::Mongo(db) => db.execute(op).await,
            Self::Memory(db) => db.execute(op).await,
        }
    }
}

#[cfg(not(feature = "mongodb"))]
impl<Op> Database<Op> for Storage
where
    Memory: Database<Op, Err = Traced<Error>>,
{
    type Ok = <Memory as Database<Op>>::Ok;
    type Err = Traced<Error>;

    async fn execute(&self, op: Op) -> Result<Self::Ok, Self::Err> {
        match self {
            Self::Memory(db) => db.execute(op).await,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Delete, Select};

    use crate::{
        domain::{post, Post},
        infra::{Database as _, Memory},
    };

    use super::Storage;

    #[tokio::test]
    async fn delegates_to_memory() {
        let storage = Storage::from(Memory::default());

        assert!(storage
            .execute(Select(By::<Vec<Post>, _>::new(())))
            .await
            .unwrap()
            .is_empty());
        assert!(!storage.execute(Delete(post::Id::new())).await.unwrap());
    }
}
