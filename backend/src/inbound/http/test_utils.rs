//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::ports::{
    MockCommentThread, MockContributorRoster, MockIssueBoard, MockLoginService,
    MockProjectWorkspace, MockUserAccounts,
};
use crate::doc::SESSION_COOKIE;
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Test-only route that signs the caller in as the user named in the path.
pub fn sign_in_route(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/test/sign-in/{user_id}",
        web::post().to(|session: SessionContext, id: web::Path<String>| async move {
            let id = UserId::new(id.into_inner())
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            session.persist_user(&id)?;
            Ok::<_, Error>(HttpResponse::NoContent().finish())
        }),
    );
}

/// Extract the session cookie issued by a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Sign in through [`sign_in_route`] and return the resulting cookie.
pub async fn signed_in<S>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test/sign-in/{user}"))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "test sign-in failed");
    session_cookie(&res)
}

/// Port doubles backing an [`HttpState`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub users: MockUserAccounts,
    pub projects: MockProjectWorkspace,
    pub contributors: MockContributorRoster,
    pub issues: MockIssueBoard,
    pub comments: MockCommentThread,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            login: Arc::new(self.login),
            users: Arc::new(self.users),
            projects: Arc::new(self.projects),
            contributors: Arc::new(self.contributors),
            issues: Arc::new(self.issues),
            comments: Arc::new(self.comments),
        })
    }
}
