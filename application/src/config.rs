//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::{Debug, Display, Error};
use serde::Deserialize;
use service::infra::mongo;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// MongoDB configuration.
    pub mongo: Mongo,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("CONF")
                    .separator(".")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors.origins"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// Indicator whether the GraphiQL IDE is served on `/graphiql`.
    #[default(true)]
    pub graphiql: bool,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    ///
    /// `*` allows any origin by mirroring the one of a request.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [JWT] secret.
    ///
    /// Must be provided explicitly.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    #[debug(skip)]
    pub jwt_secret: String,

    /// Time a session stays valid after login.
    #[default(service::Config::DEFAULT_SESSION_TTL)]
    #[serde(with = "humantime_serde")]
    pub session_ttl: time::Duration,

    /// [bcrypt] cost factor of password hashing.
    ///
    /// [bcrypt]: https://en.wikipedia.org/wiki/Bcrypt
    #[default(service::Config::DEFAULT_PASSWORD_COST)]
    pub password_cost: u32,
}

impl TryFrom<Service> for service::Config {
    type Error = EmptySecretError;

    fn try_from(value: Service) -> Result<Self, Self::Error> {
        let Service {
            jwt_secret,
            session_ttl,
            password_cost,
        } = value;

        if jwt_secret.is_empty() {
            return Err(EmptySecretError);
        }

        Ok(Self {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            session_ttl,
            password_cost,
        })
    }
}

/// Error of an empty [`Service::jwt_secret`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`service.jwt_secret` must be provided")]
pub struct EmptySecretError;

/// MongoDB configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Mongo {
    /// [Connection string] of the MongoDB deployment.
    ///
    /// In-memory storage is used if not provided.
    ///
    /// [Connection string]: https://www.mongodb.com/docs/manual/reference/connection-string
    pub uri: Option<String>,

    /// Name of the database to use.
    #[default("blog".to_owned())]
    pub database: String,
}

impl Mongo {
    /// Returns the [`mongo::Config`] to connect with, if the connection
    /// string is provided.
    #[must_use]
    pub fn connection(self) -> Option<mongo::Config> {
        let Self { uri, database } = self;
        uri.filter(|uri| !uri.is_empty())
            .map(|uri| mongo::Config { uri, database })
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
