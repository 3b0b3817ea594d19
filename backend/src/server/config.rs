//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use issue_tracker::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs besides the health state.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl: Duration,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        session_ttl: Duration,
        bind_addr: SocketAddr,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            session_ttl,
            bind_addr,
            db_pool: None,
        }
    }

    /// Back the repositories with PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
