//! [`Query`] collection related to the multiple [`Post`]s.

use common::operations::By;

use crate::domain::Post;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the stored [`Post`]s in their insertion order.
pub type All = DatabaseQuery<By<Vec<Post>, ()>>;
