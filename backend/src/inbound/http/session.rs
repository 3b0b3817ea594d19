//! Caller identity carried in the session cookie.
//!
//! Handlers never touch `actix_session` directly: protected handlers take a
//! [`SignedIn`] caller and pass its [`UserId`] into the domain explicitly,
//! while login and logout manage the [`SessionContext`] itself.

use std::future::{Ready, ready};
use std::ops::Deref;

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id, rotating the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop every value held in the session and expire the cookie.
    pub fn forget(&self) {
        self.0.purge();
    }

    /// Fetch the current user id from the session, if present.
    ///
    /// A value that no longer parses as a user id is treated as absent.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| {
            UserId::new(raw)
                .map_err(|error| warn!(%error, "invalid user id in session cookie"))
                .ok()
        }))
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// The authenticated caller.
///
/// Extraction fails with `401 Unauthorized` when the session carries no
/// user. List it before `web::Path` and `web::Json` arguments: extractors
/// resolve in argument order, so an anonymous request is refused before its
/// path or body is inspected.
#[derive(Debug, Clone)]
pub struct SignedIn(UserId);

impl SignedIn {
    pub fn into_inner(self) -> UserId {
        self.0
    }
}

impl Deref for SignedIn {
    type Target = UserId;

    fn deref(&self) -> &UserId {
        &self.0
    }
}

impl FromRequest for SignedIn {
    type Error = Error;
    type Future = Ready<Result<Self, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            SessionContext::new(req.get_session())
                .require_user_id()
                .map(SignedIn),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = session.require_user_id()?;
        Ok(HttpResponse::Ok().body(id.to_string()))
    }

    async fn echo(caller: SignedIn, body: web::Json<serde_json::Value>) -> HttpResponse {
        HttpResponse::Ok().body(format!("{}:{}", caller.into_inner(), body.into_inner()))
    }

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .route(
                "/login",
                web::get().to(|session: SessionContext| async move {
                    let id = UserId::new(USER).expect("fixture id");
                    session.persist_user(&id)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/logout",
                web::get().to(|session: SessionContext| async move {
                    session.forget();
                    HttpResponse::NoContent()
                }),
            )
            .route(
                "/tamper",
                web::get().to(|session: Session| async move {
                    session
                        .insert(USER_ID_KEY, "not-a-uuid")
                        .expect("set invalid user id");
                    HttpResponse::Ok()
                }),
            )
            .route("/whoami", web::get().to(whoami))
            .route("/echo", web::post().to(echo))
    }

    #[actix_web::test]
    async fn persisted_user_is_read_back() {
        let app = test::init_service(session_test_app()).await;

        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        assert_eq!(login.status(), StatusCode::OK);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, USER);
    }

    #[actix_web::test]
    async fn missing_user_is_unauthorised() {
        let app = test::init_service(session_test_app()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_user_id_is_unauthorised() {
        let app = test::init_service(session_test_app()).await;
        let tamper = test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(session_cookie(&tamper))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn signed_in_caller_is_extracted_alongside_the_body() {
        let app = test::init_service(session_test_app()).await;
        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/echo")
                .cookie(session_cookie(&login))
                .set_json(serde_json::json!(1))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, format!("{USER}:1"));
    }

    #[actix_web::test]
    async fn anonymous_caller_is_refused_before_the_body_is_read() {
        let app = test::init_service(session_test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/echo")
                .insert_header(("content-type", "application/json"))
                .set_payload("{")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn forget_expires_the_cookie() {
        let app = test::init_service(session_test_app()).await;
        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;

        let logout = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/logout")
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;
        assert_eq!(logout.status(), StatusCode::NO_CONTENT);
        let removal = session_cookie(&logout);
        assert_eq!(removal.value(), "");
    }
}
