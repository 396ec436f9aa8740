//! [`Database`]-related implementations.

pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;
mod storage;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "mongodb")]
pub use self::mongo::Mongo;
pub use self::{memory::Memory, storage::Storage};

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "mongodb")]
    /// [`Mongo`] error.
    Mongo(mongo::Error),

    /// [`Memory`] error.
    Memory(memory::Error),
}

impl Error {
    /// Checks whether this [`Error`] is a violation of a unique constraint
    /// (for example, a duplicated [`User`] email).
    ///
    /// [`User`]: crate::domain::User
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            #[cfg(feature = "mongodb")]
            Self::Mongo(e) => e.is_unique_violation(),
            Self::Memory(e) => e.is_unique_violation(),
        }
    }
}
