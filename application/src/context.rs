//! [`Context`]-related definitions.

use std::{
    future, mem,
    sync::atomic::{self, AtomicU16},
};

use axum::{async_trait, extract::FromRequestParts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::DateTime;
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use service::{
    command::{self, Command as _},
    domain::user::{self, session},
};
use tokio::sync::{Mutex, OnceCell};
use tracing as log;

#[cfg(doc)]
use crate::api::User;
use crate::{api, define_error, AsError, Error, JuniperResponse, Service};

/// Application context.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Error status code.
    error_status_code: AtomicU16,

    /// [`session::Token`] provided with the HTTP request, if any.
    token: Option<session::Token>,

    /// Cookies to be set by the HTTP response.
    cookies: Mutex<CookieJar>,

    /// Current [`Session`].
    current_session: OnceCell<Session>,

    /// Last authentication [`Error`].
    auth_error: OnceCell<Error>,
}

impl Context {
    /// Name of the cookie carrying a [`session::Token`].
    pub const TOKEN_COOKIE: &'static str = "token";

    /// Creates a new [`Context`] for the HTTP request with the provided
    /// `headers`.
    #[must_use]
    pub fn new(service: Service, headers: &http::HeaderMap) -> Self {
        let token = CookieJar::from_headers(headers)
            .get(Self::TOKEN_COOKIE)
            .map(|c| {
                #[expect(unsafe_code, reason = "verified on authentication")]
                unsafe {
                    session::Token::new_unchecked(c.value().to_owned())
                }
            });

        Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            token,
            cookies: Mutex::new(CookieJar::new()),
            current_session: OnceCell::new(),
            auth_error: OnceCell::new(),
        }
    }

    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the error status code of this [`Context`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .expect("invalid status code")
    }

    /// Sets the error status code for this [`Context`].
    ///
    /// Provided [`http::StatusCode`] will be applied to the response.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Helper method calling [`Context::set_error_status_code()`] inside
    /// [`Result::map_err()`] closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Starts the provided [`Session`] by setting its [`session::Token`] as
    /// the response cookie.
    ///
    /// The started [`Session`] becomes the current one for this [`Context`].
    pub async fn start_session(&self, session: Session) {
        let max_age = time::Duration::try_from(self.service.config().session_ttl)
            .unwrap_or(time::Duration::MAX);
        let cookie = Cookie::build((
            Self::TOKEN_COOKIE,
            session.token.as_ref().to_owned(),
        ))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(max_age);

        let mut cookies = self.cookies.lock().await;
        *cookies = mem::take(&mut *cookies).add(cookie);
        drop(cookies);

        _ = self
            .current_session
            .get_or_init(|| future::ready(session))
            .await;
    }

    /// Ends the client's [`Session`] by instructing it to discard the
    /// [`session::Token`] cookie.
    pub async fn end_session(&self) {
        let mut cookie =
            Cookie::build((Self::TOKEN_COOKIE, "")).path("/").build();
        cookie.make_removal();

        let mut cookies = self.cookies.lock().await;
        *cookies = mem::take(&mut *cookies).add(cookie);
    }

    /// Returns the cookies to be set by the HTTP response.
    #[must_use]
    pub fn into_cookies(self) -> CookieJar {
        self.cookies.into_inner()
    }

    /// Returns the current [`Session`] for this [`Context`].
    ///
    /// # Errors
    ///
    /// Errors with `AUTHORIZATION_REQUIRED` code if the current HTTP request
    /// carries no valid [`session::Token`].
    pub async fn current_session(&self) -> Result<Session, Error> {
        self.current_session
            .get_or_try_init(|| async {
                match self
                    .auth_error
                    .get_or_try_init(|| async {
                        match self.do_authentication().await {
                            Ok(s) => Err(s),
                            Err(e) => Ok(e),
                        }
                    })
                    .await
                {
                    Ok(e) => Err(e),
                    Err(s) => Ok(s),
                }
            })
            .await
            .cloned()
            .map_err(Clone::clone)
    }

    /// Performs the [`Session`] authentication.
    ///
    /// # Errors
    ///
    /// Errors if the [`session::Token`] is absent or invalid.
    async fn do_authentication(&self) -> Result<Session, Error> {
        let Some(token) = self.token.clone() else {
            return Err(AuthError::AuthorizationRequired.into());
        };

        self.service
            .execute(command::AuthorizeUserSession {
                token: token.clone(),
            })
            .await
            .map(|s| Session {
                user_id: s.user_id.into(),
                email: s.email,
                token,
                expires_at: s.expires_at.coerce(),
            })
            .map_err(|e| {
                log::debug!("session authorization failed: {e}");
                e.into_error()
            })
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                JuniperResponse {
                    status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
                    response: GraphQLBatchResponse::Single(
                        GraphQLResponse::error(
                            Error::internal(&"missing `Service` extension")
                                .into_field_error(),
                        ),
                    ),
                }
            })?;

        Ok(Self::new(service, &parts.headers))
    }
}

/// User session.
#[derive(Clone, Debug)]
pub struct Session {
    /// ID of the [`User`] associated with this [`Session`].
    pub user_id: api::user::Id,

    /// Email of the [`User`] associated with this [`Session`].
    pub email: user::Email,

    /// Authentication token.
    pub token: session::Token,

    /// [`DateTime`] when this [`Session`] expires.
    pub expires_at: DateTime,
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::JsonWebTokenDecodeError(_) => {
                Some(AuthError::AuthorizationRequired.into())
            }
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,
    }
}
