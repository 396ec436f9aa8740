//! Application provides GraphQL API of the blog [`Service`].

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

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;

use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, on, MethodFilter},
    Extension, Json, Router,
};
use axum_extra::extract::CookieJar;
use derive_more::Debug;
use juniper::{http::GraphQLBatchResponse, DefaultScalarValue, ScalarValue};
use juniper_axum::extract::JuniperRequest;
use tower_http::cors::{AllowOrigin, CorsLayer};
// Used in binary.
use axum_client_ip as _;
use dotenvy as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::{Context, Session},
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Storage>;

/// [`juniper`] GraphQL response.
#[derive(Debug)]
pub struct JuniperResponse<S = DefaultScalarValue>
where
    S: ScalarValue,
{
    /// Status code of the response.
    pub status_code: http::StatusCode,

    /// Underlying GraphQL response.
    #[debug(skip)]
    pub response: GraphQLBatchResponse<S>,
}

impl<S> IntoResponse for JuniperResponse<S>
where
    S: ScalarValue,
{
    fn into_response(self) -> Response {
        let Self {
            status_code,
            response,
        } = self;

        if response.is_ok() {
            Json(response).into_response()
        } else {
            (status_code, Json(response)).into_response()
        }
    }
}

/// GraphQL API handler.
///
/// Responds with the cookies set while executing the request.
pub async fn graphql(
    Extension(schema): Extension<Arc<api::Schema>>,
    context: Context,
    JuniperRequest(gql_request): JuniperRequest,
) -> (CookieJar, JuniperResponse) {
    let response = gql_request.execute(&*schema, &context).await;
    let status_code = context.error_status_code();
    (
        context.into_cookies(),
        JuniperResponse {
            status_code,
            response,
        },
    )
}

/// Creates a new [`Router`] serving the GraphQL API of the provided
/// [`Service`].
///
/// # Errors
///
/// If any of the configured CORS origins is not a valid header value.
pub fn router(
    service: Service,
    conf: &config::Server,
) -> Result<Router, http::header::InvalidHeaderValue> {
    let origins = &conf.cors.origins;
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .map(|o| o.parse::<http::HeaderValue>())
                .collect::<Result<Vec<_>, _>>()?,
        )
    };
    let cors = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::OPTIONS,
            http::Method::POST,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_credentials(true)
        .allow_origin(allow_origin);

    let mut router = Router::new().route(
        "/graphql",
        on(MethodFilter::GET.or(MethodFilter::POST), graphql),
    );
    if conf.graphiql {
        router = router.route(
            "/graphiql",
            get(juniper_axum::graphiql("/graphql", None::<&str>)),
        );
    }

    Ok(router
        .layer(Extension(Arc::new(api::schema())))
        .layer(Extension(service))
        .layer(cors))
}

#[cfg(test)]
mod spec {
    use axum::{body::Body, Router};
    use http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use service::infra::Memory;
    use tower::ServiceExt as _;

    use crate::{config, router, Service};

    struct Response {
        status: StatusCode,
        cookies: Vec<String>,
        body: Value,
    }

    fn app() -> Router {
        let service = Service::new(
            service::Config {
                password_cost: 4,
                ..service::Config::with_secret("test-secret")
            },
            Memory::default().into(),
        );
        router(service, &config::Server::default()).unwrap()
    }

    async fn gql(app: &Router, query: &str, cookie: Option<&str>) -> Response {
        let mut req = Request::post("/graphql")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        let req = req
            .body(Body::from(json!({ "query": query }).to_string()))
            .unwrap();

        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let cookies = res
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_owned())
            .collect();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();

        Response {
            status,
            cookies,
            body: serde_json::from_slice(&body).unwrap(),
        }
    }

    fn error_code(res: &Response) -> Option<&str> {
        res.body["errors"][0]["extensions"]["code"].as_str()
    }

    async fn login(app: &Router) -> String {
        let res = gql(
            app,
            r#"mutation {
                register(email: "a@example.com", password: "secret1") { id }
            }"#,
            None,
        )
        .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.body);

        let res = gql(
            app,
            r#"mutation {
                login(email: "a@example.com", password: "secret1") {
                    expiresAt
                }
            }"#,
            None,
        )
        .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.body);

        res.cookies[0]
            .split(';')
            .next()
            .unwrap()
            .to_owned()
    }

    #[tokio::test]
    async fn registers_without_exposing_hash() {
        let res = gql(
            &app(),
            r#"mutation {
                register(email: "a@example.com", password: "secret1") {
                    id
                    email
                    createdAt
                }
            }"#,
            None,
        )
        .await;

        assert_eq!(res.status, StatusCode::OK, "{}", res.body);
        let user = &res.body["data"]["register"];
        assert_eq!(user["email"], "a@example.com");
        assert!(user["id"].is_string());
        assert!(user["createdAt"].is_string());
        assert!(!res.body.to_string().contains("$2"));
    }

    #[tokio::test]
    async fn rejects_duplicate_registration() {
        let app = app();
        let query = r#"mutation {
            register(email: "a@example.com", password: "secret1") { id }
        }"#;

        assert_eq!(gql(&app, query, None).await.status, StatusCode::OK);

        let res = gql(&app, query, None).await;
        assert_eq!(res.status, StatusCode::CONFLICT);
        assert_eq!(error_code(&res), Some("EMAIL_OCCUPIED"));
    }

    #[tokio::test]
    async fn sets_session_cookie_on_login() {
        let app = app();
        drop(login(&app).await);

        let res = gql(
            &app,
            r#"mutation {
                login(email: "a@example.com", password: "secret1") {
                    user { email }
                    expiresAt
                }
            }"#,
            None,
        )
        .await;

        assert_eq!(res.body["data"]["login"]["user"]["email"], "a@example.com");
        let cookie = &res.cookies[0];
        assert!(cookie.starts_with("token="), "{cookie}");
        assert!(cookie.contains("HttpOnly"), "{cookie}");
        assert!(cookie.contains("Path=/"), "{cookie}");
        assert!(cookie.contains("SameSite=Lax"), "{cookie}");
        assert!(cookie.contains("Max-Age=900"), "{cookie}");
    }

    #[tokio::test]
    async fn fails_login_without_cookie() {
        let app = app();
        drop(login(&app).await);

        let res = gql(
            &app,
            r#"mutation {
                login(email: "a@example.com", password: "wrong") { expiresAt }
            }"#,
            None,
        )
        .await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&res), Some("WRONG_PASSWORD"));
        assert!(res.cookies.is_empty());

        let res = gql(
            &app,
            r#"mutation {
                login(email: "b@example.com", password: "secret1") {
                    expiresAt
                }
            }"#,
            None,
        )
        .await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&res), Some("USER_NOT_EXISTS"));
        assert!(res.cookies.is_empty());
    }

    #[tokio::test]
    async fn requires_session_for_mutating_posts() {
        let app = app();

        for (query, cookie) in [
            (r#"mutation { addPost(title: "t") { id } }"#, None),
            (
                r#"mutation { addPost(title: "t") { id } }"#,
                Some("token=garbage"),
            ),
            (
                r#"mutation {
                    deletePost(id: "00000000-0000-0000-0000-000000000000")
                }"#,
                None,
            ),
        ] {
            let res = gql(&app, query, cookie).await;
            assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{}", res.body);
            assert_eq!(error_code(&res), Some("AUTHORIZATION_REQUIRED"));
        }

        let res = gql(&app, "{ posts { id } }", None).await;
        assert_eq!(res.body["data"]["posts"], json!([]));
    }

    #[tokio::test]
    async fn manages_posts_with_session() {
        let app = app();
        let cookie = login(&app).await;

        let res = gql(
            &app,
            r#"mutation {
                addPost(
                    title: "Title",
                    body: "Body",
                    author: "Author",
                    date: "2020-01-02T03:04:05Z",
                ) { id title body image author date }
            }"#,
            Some(&cookie),
        )
        .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.body);
        let post = &res.body["data"]["addPost"];
        assert_eq!(post["title"], "Title");
        assert_eq!(post["image"], Value::Null);
        let id = post["id"].as_str().unwrap().to_owned();

        let res = gql(
            &app,
            &format!(r#"{{ post(id: "{id}") {{ title body author date }} }}"#),
            None,
        )
        .await;
        let found = &res.body["data"]["post"];
        assert_eq!(found["title"], "Title");
        assert_eq!(found["body"], "Body");
        assert_eq!(found["author"], "Author");
        assert!(found["date"].as_str().unwrap().starts_with("2020-01-02"));

        let res = gql(&app, "{ posts { id } }", None).await;
        assert_eq!(res.body["data"]["posts"][0]["id"], id.as_str());

        let delete = format!(r#"mutation {{ deletePost(id: "{id}") }}"#);
        let res = gql(&app, &delete, Some(&cookie)).await;
        assert_eq!(res.body["data"]["deletePost"], true);
        let res = gql(&app, &delete, Some(&cookie)).await;
        assert_eq!(res.body["data"]["deletePost"], false);

        let res = gql(
            &app,
            &format!(r#"{{ post(id: "{id}") {{ id }} }}"#),
            None,
        )
        .await;
        assert_eq!(res.body["data"]["post"], Value::Null);
    }

    #[tokio::test]
    async fn discards_cookie_on_logout() {
        let res = gql(&app(), "mutation { logout }", None).await;

        assert_eq!(res.body["data"]["logout"], true);
        let cookie = &res.cookies[0];
        assert!(cookie.starts_with("token=;"), "{cookie}");
        assert!(cookie.contains("Max-Age=0"), "{cookie}");
    }

    #[tokio::test]
    async fn serves_graphiql() {
        let res = app()
            .oneshot(Request::get("/graphiql").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }
}
