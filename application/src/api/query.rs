//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, Query as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Post` with the specified ID, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "post",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn post(
        id: api::post::Id,
        ctx: &Context,
    ) -> Result<Option<api::Post>, Error> {
        ctx.service()
            .execute(query::post::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|p| p.map(Into::into))
    }

    /// Returns all the `Post`s in the order they were created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "posts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn posts(ctx: &Context) -> Result<Vec<api::Post>, Error> {
        ctx.service()
            .execute(query::posts::All::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|posts| posts.into_iter().map(Into::into).collect())
    }
}
