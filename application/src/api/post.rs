//! [`Post`]-related definitions.

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// A [`Post`] of the blog.
#[derive(Clone, Debug, From, Into)]
pub struct Post(domain::Post);

/// A `Post` of the blog.
#[graphql_object(context = Context)]
impl Post {
    /// Unique identifier of this `Post`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Post.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Title of this `Post`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Post.title",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn title(&self) -> Option<&str> {
        self.0.title.as_ref().map(AsRef::as_ref)
    }

    /// Body of this `Post`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Post.body",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn body(&self) -> Option<&str> {
        self.0.body.as_ref().map(AsRef::as_ref)
    }

    /// Image of this `Post`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Post.image",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn image(&self) -> Option<&str> {
        self.0.image.as_ref().map(AsRef::as_ref)
    }

    /// Author of this `Post`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Post.author",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn author(&self) -> Option<&str> {
        self.0.author.as_ref().map(AsRef::as_ref)
    }

    /// `DateTime` this `Post` is published at.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Post.date",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn date(&self) -> DateTime {
        self.0.date.coerce()
    }
}

/// Unique identifier of a `Post`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::post::Id)]
#[into(domain::post::Id)]
#[graphql(name = "PostId", transparent)]
pub struct Id(Uuid);
