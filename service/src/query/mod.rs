//! [`Query`] definition.

pub mod post;
pub mod posts;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from a [`Database`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct DatabaseQuery<T>(T);

impl<W, B> DatabaseQuery<By<W, B>> {
    /// Creates a new [`DatabaseQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Db, W, B> Query<DatabaseQuery<By<W, B>>> for Service<Db>
where
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        DatabaseQuery(by): DatabaseQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::Handler as _;

    use crate::{command::CreatePost, domain::post, test};

    use super::{post::ById, posts::All};

    #[tokio::test]
    async fn selects_post_by_id() {
        let service = test::service();
        let created = service
            .execute(CreatePost {
                title: Some("Hello".into()),
                ..CreatePost::default()
            })
            .await
            .unwrap();

        let found = service.execute(ById::by(created.id)).await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(created.id));

        assert!(service
            .execute(ById::by(post::Id::new()))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn lists_all_posts() {
        let service = test::service();
        assert!(service.execute(All::by(())).await.unwrap().is_empty());

        let first = service.execute(CreatePost::default()).await.unwrap();
        let second = service.execute(CreatePost::default()).await.unwrap();

        let ids = service
            .execute(All::by(()))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, [first.id, second.id]);
    }
}
