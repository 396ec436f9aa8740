//! [`Command`] for authorizing a [`User`].

use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::user::{session, Session},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`User`] by a [`Session`] token.
///
/// Only the signature and the expiration of the token are checked, so no
/// [`Database`] access is involved.
///
/// [`Database`]: crate::infra::Database
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeUserSession> for Service<Db> {
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let mut validation = Validation::default();
        validation.leeway = 0;

        jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config().jwt_decoding_key,
            &validation,
        )
        .map(|data| data.claims)
        .map_err(tracerr::from_and_wrap!(=> E))
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] decoding error.
    ///
    /// Covers malformed, forged and expired tokens.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{DateTime, Handler as _};
    use secrecy::SecretBox;

    use crate::{
        command::{CreateUser, CreateUserSession},
        domain::user::{self, session, Session},
        test, Config,
    };

    use super::AuthorizeUserSession;

    #[expect(unsafe_code, reason = "tokens are built by tests")]
    fn token(s: String) -> session::Token {
        unsafe { session::Token::new_unchecked(s) }
    }

    #[tokio::test]
    async fn accepts_issued_token() {
        let service = test::service();
        let user = service
            .execute(CreateUser {
                email: "a@example.com".into(),
                password: SecretBox::new(Box::new("secret1".into())),
            })
            .await
            .unwrap();
        let out = service
            .execute(CreateUserSession {
                email: "a@example.com".into(),
                password: SecretBox::new(Box::new("secret1".into())),
            })
            .await
            .unwrap();

        let session = service
            .execute(AuthorizeUserSession { token: out.token })
            .await
            .unwrap();

        assert_eq!(session.user_id, user.id);
        assert_eq!(session.email, user.email);
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let service = test::service();
        let expired = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id: user::Id::new(),
                email: "a@example.com".into(),
                expires_at: (DateTime::now() - Duration::from_secs(1))
                    .coerce(),
            },
            &service.config().jwt_encoding_key,
        )
        .unwrap();

        assert!(service
            .execute(AuthorizeUserSession {
                token: token(expired),
            })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn rejects_foreign_signature() {
        let service = test::service();
        let forged = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id: user::Id::new(),
                email: "a@example.com".into(),
                expires_at: (DateTime::now() + Duration::from_secs(60))
                    .coerce(),
            },
            &Config::with_secret("another-secret").jwt_encoding_key,
        )
        .unwrap();

        assert!(service
            .execute(AuthorizeUserSession {
                token: token(forged),
            })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn rejects_garbage() {
        assert!(test::service()
            .execute(AuthorizeUserSession {
                token: token("not-a-jwt".into()),
            })
            .await
            .is_err());
    }
}
