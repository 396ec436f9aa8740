//! Infrastructure layer.

pub mod database;

#[cfg(feature = "mongodb")]
pub use self::database::{mongo, Mongo};
pub use self::database::{memory, Database, Memory, Storage};
