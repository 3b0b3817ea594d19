//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::TrackerSettings;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use issue_tracker::Trace;
#[cfg(debug_assertions)]
use issue_tracker::doc::ApiDoc;
use issue_tracker::doc::SESSION_COOKIE;
use issue_tracker::inbound::http::health::{HealthState, live, ready};
use issue_tracker::inbound::http::routes;
use issue_tracker::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    session_ttl: Duration,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
        session_ttl,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .configure(routes::configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and mark the service ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        session_ttl,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            session_ttl,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::{fixture, rstest};

    #[fixture]
    fn health_state() -> web::Data<HealthState> {
        web::Data::new(HealthState::new())
    }

    fn config() -> ServerConfig {
        ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            Duration::hours(2),
            "127.0.0.1:0".parse().expect("socket address"),
        )
    }

    #[rstest]
    #[actix_web::test]
    async fn create_server_marks_ready(health_state: web::Data<HealthState>) {
        assert!(!health_state.is_ready(), "state should start unready");

        let _server = create_server(health_state.clone(), config()).expect("server should bind");

        assert!(health_state.is_ready(), "server creation should mark readiness");
    }

    #[rstest]
    #[actix_web::test]
    async fn app_serves_probes_and_guards_the_api(health_state: web::Data<HealthState>) {
        let config = config();
        let app = actix_test::init_service(build_app(AppDependencies {
            health_state,
            http_state: build_http_state(&config),
            key: config.key.clone(),
            cookie_secure: false,
            same_site: SameSite::Lax,
            session_ttl: Duration::hours(2),
        }))
        .await;

        let live_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert_eq!(live_res.status(), StatusCode::OK);
        assert!(live_res.headers().contains_key("trace-id"));

        let projects = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/projects").to_request(),
        )
        .await;
        assert_eq!(projects.status(), StatusCode::UNAUTHORIZED);
    }
}
