//! Repository selection and HTTP state assembly.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;

use issue_tracker::domain::TrackerRepositories;
use issue_tracker::inbound::http::state::HttpState;
use issue_tracker::outbound::memory::InMemoryStore;
use issue_tracker::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselContributorRepository, DieselIssueRepository,
    DieselProjectRepository, DieselUserRepository,
};

use super::ServerConfig;

fn diesel_repositories(pool: &DbPool) -> TrackerRepositories {
    TrackerRepositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        projects: Arc::new(DieselProjectRepository::new(pool.clone())),
        contributors: Arc::new(DieselContributorRepository::new(pool.clone())),
        issues: Arc::new(DieselIssueRepository::new(pool.clone())),
        comments: Arc::new(DieselCommentRepository::new(pool.clone())),
    }
}

/// PostgreSQL repositories when a pool is configured, otherwise a fresh
/// in-memory store whose contents vanish on restart.
pub(super) fn build_repositories(pool: Option<&DbPool>) -> TrackerRepositories {
    match pool {
        Some(pool) => diesel_repositories(pool),
        None => {
            warn!("TRACKER_DATABASE_URL not set; using the in-memory store (data is not persisted)");
            InMemoryStore::new().tracker_repositories()
        }
    }
}

pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repositories = build_repositories(config.db_pool.as_ref());
    web::Data::new(HttpState::from_repositories(
        repositories,
        Arc::new(DefaultClock),
    ))
}
