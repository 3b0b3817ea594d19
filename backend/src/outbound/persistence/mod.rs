//! PostgreSQL persistence adapters using Diesel.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; no business logic lives here. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private to this module. Connections come
//! from a `bb8` pool through `diesel-async`, and every database failure is
//! mapped onto the owning port's error enum.
//!
//! # Example
//!
//! ```no_run
//! use issue_tracker::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tracker")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_comment_repository;
mod diesel_contributor_repository;
mod diesel_error_mapping;
mod diesel_issue_repository;
mod diesel_project_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_contributor_repository::DieselContributorRepository;
pub use diesel_issue_repository::DieselIssueRepository;
pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
