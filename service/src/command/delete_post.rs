//! [`Command`] for deleting a [`Post`].

use common::operations::Delete;
use tracerr::Traced;

use crate::{
    domain::{post, Post},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Post`].
///
/// Outputs whether the [`Post`] existed before.
#[derive(Clone, Copy, Debug)]
pub struct DeletePost {
    /// ID of the [`Post`] to delete.
    pub id: post::Id,
}

impl<Db> Command<DeletePost> for Service<Db>
where
    Db: Database<Delete<post::Id>, Ok = bool, Err = Traced<database::Error>>,
{
    type Ok = bool;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeletePost) -> Result<Self::Ok, Self::Err> {
        let DeletePost { id } = cmd;

        self.database()
            .execute(Delete(id))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`DeletePost`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use common::Handler as _;

    use crate::{command::CreatePost, domain::post, query, test};

    use super::DeletePost;

    #[tokio::test]
    async fn deletes_existing_post() {
        let service = test::service();
        let post = service.execute(CreatePost::default()).await.unwrap();

        assert!(service.execute(DeletePost { id: post.id }).await.unwrap());
        assert!(service
            .execute(query::post::ById::by(post.id))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn reports_missing_post() {
        let service = test::service();
        let post = service.execute(CreatePost::default()).await.unwrap();

        assert!(!service
            .execute(DeletePost { id: post::Id::new() })
            .await
            .unwrap());
        assert_eq!(
            service.execute(query::posts::All::by(())).await.unwrap().len(),
            1,
        );
    }
}
