//! [`Query`] collection related to a single [`Post`].

use common::operations::By;

use crate::domain::{post, Post};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Post`] by its [`post::Id`].
pub type ById = DatabaseQuery<By<Option<Post>, post::Id>>;
