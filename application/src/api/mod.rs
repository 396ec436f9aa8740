//! GraphQL API definitions.

mod mutation;
pub mod post;
mod query;
pub mod scalar;
pub mod user;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{mutation::Mutation, post::Post, query::Query, user::User};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
