//! [`Command`] for creating a [`Session`].

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::SecretBox;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{session::Token, Email, Password};
use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`] by [`User`] credentials.
#[derive(Clone, Debug)]
pub struct CreateUserSession {
    /// [`Email`] of a [`User`].
    pub email: user::Email,

    /// [`Password`] of a [`User`].
    pub password: SecretBox<user::Password>,
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// [`User`] whose [`Session`] has been created.
    pub user: User,

    /// [`DateTime`] when the [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

impl<Db> Command<CreateUserSession> for Service<Db>
where
    Db: for<'l> Database<
        Select<By<Option<User>, &'l user::Email>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUserSession { email, password } = cmd;

        let user = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::UserNotExists(email.clone()))
            .map_err(tracerr::wrap!())?;

        let matches = user
            .password_hash
            .verify(password)
            .await
            .map_err(tracerr::from_and_wrap!(=> E))?;
        if !matches {
            return Err(tracerr::new!(E::WrongPassword));
        }

        let expires_at = DateTime::now()
            .checked_add(self.config().session_ttl)
            .ok_or(E::ExpirationOutOfRange)
            .map_err(tracerr::wrap!())?
            .coerce();
        let token = jsonwebtoken::encode::<Session>(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id: user.id,
                email: user.email.clone(),
                expires_at,
            },
            &self.config().jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Output {
            token,
            user,
            expires_at,
        })
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`user::PasswordHash`] verification failed.
    #[display("Failed to verify a password: {_0}")]
    Hashing(user::HashingError),

    /// [`Session`] expiration overflows the supported [`DateTime`] range.
    #[display("`Session` expiration `DateTime` is out of range")]
    ExpirationOutOfRange,

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`User`] with the provided [`user::Email`] does not exist.
    #[display("`User(email: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Email),

    /// Provided [`user::Password`] doesn't match the stored one.
    #[display("Wrong `User` password")]
    WrongPassword,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{DateTime, Handler as _};
    use jsonwebtoken::Validation;
    use secrecy::SecretBox;

    use crate::{
        command::CreateUser,
        domain::user::{self, Session},
        infra::Memory,
        test, Config, Service,
    };

    use super::{CreateUserSession, ExecutionError};

    fn secret(password: &str) -> SecretBox<user::Password> {
        SecretBox::new(Box::new(password.into()))
    }

    #[tokio::test]
    async fn issues_signed_token() {
        let service = test::service();
        let user = service
            .execute(CreateUser {
                email: "a@example.com".into(),
                password: secret("secret1"),
            })
            .await
            .unwrap();
        let before = DateTime::now();

        let out = service
            .execute(CreateUserSession {
                email: "a@example.com".into(),
                password: secret("secret1"),
            })
            .await
            .unwrap();

        assert_eq!(out.user.id, user.id);
        let ttl = out.expires_at.unix_timestamp_millis()
            - before.unix_timestamp_millis();
        assert!(ttl >= 15 * 60 * 1000, "{ttl}");
        assert!(ttl < 15 * 60 * 1000 + 5000, "{ttl}");

        let session = jsonwebtoken::decode::<Session>(
            out.token.as_ref(),
            &service.config().jwt_decoding_key,
            &Validation::default(),
        )
        .unwrap()
        .claims;
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.email, user.email);
        assert_eq!(
            session.expires_at.unix_timestamp(),
            out.expires_at.unix_timestamp(),
        );
    }

    #[tokio::test]
    async fn fails_for_unknown_email() {
        let err = test::service()
            .execute(CreateUserSession {
                email: "nobody@example.com".into(),
                password: secret("secret1"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::UserNotExists(_)));
    }

    #[tokio::test]
    async fn fails_for_wrong_password() {
        let service = test::service();
        drop(
            service
                .execute(CreateUser {
                    email: "a@example.com".into(),
                    password: secret("secret1"),
                })
                .await
                .unwrap(),
        );

        let err = service
            .execute(CreateUserSession {
                email: "a@example.com".into(),
                password: secret("secret2"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::WrongPassword));
    }

    #[tokio::test]
    async fn fails_for_out_of_range_expiration() {
        let service = Service::new(
            Config {
                session_ttl: Duration::from_secs(400_000 * 365 * 24 * 3600),
                password_cost: 4,
                ..Config::with_secret("test-secret")
            },
            Memory::default(),
        );
        drop(
            service
                .execute(CreateUser {
                    email: "a@example.com".into(),
                    password: secret("secret1"),
                })
                .await
                .unwrap(),
        );

        let err = service
            .execute(CreateUserSession {
                email: "a@example.com".into(),
                password: secret("secret1"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ExpirationOutOfRange));
    }
}
