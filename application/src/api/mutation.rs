//! GraphQL [`Mutation`]s definitions.

use common::DateTime;
use juniper::graphql_object;
use service::{command, Command as _};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Post` with the provided contents.
    ///
    /// The current `DateTime` is used if no `date` is provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - no valid `token` cookie is provided.
    #[tracing::instrument(
        skip_all,
        fields(
            author = ?author,
            date = ?date,
            gql.name = "addPost",
            otel.name = Self::SPAN_NAME,
            title = ?title,
        ),
    )]
    pub async fn add_post(
        title: Option<String>,
        body: Option<String>,
        image: Option<String>,
        author: Option<String>,
        date: Option<DateTime>,
        ctx: &Context,
    ) -> Result<api::Post, Error> {
        drop(ctx.current_session().await.map_err(ctx.error())?);

        ctx.service()
            .execute(command::CreatePost {
                title: title.map(Into::into),
                body: body.map(Into::into),
                image: image.map(Into::into),
                author: author.map(Into::into),
                date: date.map(DateTime::coerce),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Post` with the provided ID.
    ///
    /// Returns `false` if there was no such `Post`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - no valid `token` cookie is provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deletePost",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_post(
        id: api::post::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        drop(ctx.current_session().await.map_err(ctx.error())?);

        ctx.service()
            .execute(command::DeletePost { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Registers a new `User` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMAIL_OCCUPIED` - provided `UserEmail` is occupied by another
    ///                      `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "register",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn register(
        email: api::user::Email,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        ctx.service()
            .execute(command::CreateUser {
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Logs in the `User` with the provided credentials.
    ///
    /// The created `Session` token is set as the `token` HTTP-only cookie.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - no `User` has the provided `UserEmail`;
    /// - `WRONG_PASSWORD` - provided `UserPassword` doesn't match.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "login",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn login(
        email: api::user::Email,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession {
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.start_session(Session {
            user_id: output.user.id.into(),
            email: output.user.email.clone(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Logs out the current `User` by discarding the `token` cookie.
    ///
    /// Always succeeds, even if there is no `Session`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "logout",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn logout(ctx: &Context) -> bool {
        ctx.end_session().await;
        true
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`UserEmail` is occupied by another `User`"]
                EmailOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(Error::EmailOccupied.into()),
            Self::Hashing(_) => None,
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "USER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`User` with the provided `UserEmail` does not \
                             exist"]
                UserNotExists,

                #[code = "WRONG_PASSWORD"]
                #[status = UNAUTHORIZED]
                #[message = "Provided `UserPassword` is wrong"]
                WrongPassword,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ExpirationOutOfRange
            | Self::Hashing(_)
            | Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotExists(_) => Some(Error::UserNotExists.into()),
            Self::WrongPassword => Some(Error::WrongPassword.into()),
        }
    }
}
