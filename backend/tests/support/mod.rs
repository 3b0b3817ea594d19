//! Shared harness for the HTTP integration suites.
//!
//! Builds the real route table over an in-memory store and offers a small
//! client that keeps track of who is signed in.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use issue_tracker::Trace;
use issue_tracker::doc::SESSION_COOKIE;
use issue_tracker::inbound::http::routes;
use issue_tracker::inbound::http::state::HttpState;
use issue_tracker::outbound::memory::InMemoryStore;

/// The API mounted under `/api/v1` over a fresh in-memory store.
pub fn tracker_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::from_repositories(
        InMemoryStore::new().tracker_repositories(),
        Arc::new(DefaultClock),
    );
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .cookie_content_security(CookieContentSecurity::Private)
        .build();

    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(session)
                .configure(routes::configure),
        )
}

/// Response status with the decoded JSON body (`Null` when empty).
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    /// `details.code` of an error body.
    pub fn detail_code(&self) -> Option<&str> {
        self.body["details"]["code"].as_str()
    }

    pub fn id(&self) -> String {
        match &self.body["id"] {
            Value::String(id) => id.clone(),
            other => other.to_string(),
        }
    }
}

/// Send `req`, optionally authenticated with `cookie`.
pub async fn send<S>(app: &S, req: test::TestRequest, cookie: Option<&Cookie<'static>>) -> Reply
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = match cookie {
        Some(cookie) => req.cookie(cookie.clone()),
        None => req,
    };
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    Reply { status, body }
}

/// A registered account and its session cookie.
pub struct Member {
    pub id: String,
    pub cookie: Cookie<'static>,
}

/// Register `username` through the public endpoint, then log in.
pub async fn join<S>(app: &S, username: &str) -> Member
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let password = format!("{username}-passphrase");
    let registered = send(
        app,
        test::TestRequest::post().uri("/api/v1/users").set_json(json!({
            "username": username,
            "password": password,
            "firstName": "Test",
            "lastName": "Member",
            "dateBirth": "1990-05-17",
        })),
        None,
    )
    .await;
    assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login should succeed");
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie set");

    Member {
        id: registered.id(),
        cookie,
    }
}

/// Create a back-end project owned by `author`, returning its id.
pub async fn create_project<S>(app: &S, author: &Member, name: &str) -> i64
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = send(
        app,
        test::TestRequest::post().uri("/api/v1/projects").set_json(json!({
            "name": name,
            "description": "Integration test project",
            "type": "back-end",
        })),
        Some(&author.cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    reply.body["id"].as_i64().expect("numeric project id")
}

/// Add `member` to `project` on behalf of `author`, returning the
/// membership id.
pub async fn add_contributor<S>(app: &S, author: &Member, project: i64, member: &Member) -> i64
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = send(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/projects/{project}/contributors"))
            .set_json(json!({ "user": member.id })),
        Some(&author.cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    reply.body["id"].as_i64().expect("numeric contributor id")
}
