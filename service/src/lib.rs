//! Service contains the business logic of the blog.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;

use std::time::Duration;

use derive_more::Debug;
// Used by MongoDB infrastructure only.
#[cfg(not(feature = "mongodb"))]
use tracing as _;

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// [`Duration`] a [`Session`] stays valid after being created.
    ///
    /// [`Session`]: domain::user::Session
    pub session_ttl: Duration,

    /// [bcrypt] cost factor used to hash passwords.
    ///
    /// [bcrypt]: https://en.wikipedia.org/wiki/Bcrypt
    pub password_cost: u32,
}

impl Config {
    /// Default [`Config::session_ttl`].
    pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(15 * 60);

    /// Default [`Config::password_cost`].
    pub const DEFAULT_PASSWORD_COST: u32 = 10;

    /// Creates a new [`Config`] signing [`Session`]s with the provided
    /// `secret` and using default values for everything else.
    ///
    /// [`Session`]: domain::user::Session
    #[must_use]
    pub fn with_secret(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(secret),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(secret),
            session_ttl: Self::DEFAULT_SESSION_TTL,
            password_cost: Self::DEFAULT_PASSWORD_COST,
        }
    }
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db) -> Self {
        Self { config, database }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }
}

#[cfg(test)]
pub(crate) mod test {
    //! Helpers for testing the [`Service`].

    use crate::{infra::Memory, Config, Service};

    /// Creates a new [`Service`] backed by an empty [`Memory`] store.
    pub(crate) fn service() -> Service<Memory> {
        Service::new(
            Config {
                // Minimal cost accepted by `bcrypt`.
                password_cost: 4,
                ..Config::with_secret("test-secret")
            },
            Memory::default(),
        )
    }
}
