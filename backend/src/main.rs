//! Backend entry-point: loads configuration, prepares storage and serves the
//! tracker API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use issue_tracker::inbound::http::health::HealthState;
use issue_tracker::inbound::http::session_config::{BuildMode, session_settings_from_env};
use issue_tracker::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, TrackerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = TrackerSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let session =
        session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
            .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr()?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        session.ttl,
        bind_addr,
    );

    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .map_err(std::io::Error::other)?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "issue tracker listening");
    server.await
}
