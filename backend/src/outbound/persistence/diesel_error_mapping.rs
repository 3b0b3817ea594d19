//! Translate pool and Diesel failures into repository port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use crate::domain::ports::{TrackerPersistenceError, UserPersistenceError};

use super::pool::PoolError;

fn pool_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}

pub(super) fn map_user_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_message(error))
}

pub(super) fn map_tracker_pool_error(error: PoolError) -> TrackerPersistenceError {
    TrackerPersistenceError::connection(pool_message(error))
}

pub(super) fn map_user_diesel_error(error: DieselError) -> UserPersistenceError {
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::duplicate_username()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

pub(super) fn map_tracker_diesel_error(error: DieselError) -> TrackerPersistenceError {
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TrackerPersistenceError::duplicate_contributor()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            TrackerPersistenceError::missing_reference(referenced_entity(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            TrackerPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => TrackerPersistenceError::query("record not found"),
        _ => TrackerPersistenceError::query("database error"),
    }
}

/// Name the request field behind a foreign-key constraint such as
/// `issues_assignee_id_fkey`.
fn referenced_entity(constraint: Option<&str>) -> &'static str {
    let Some(constraint) = constraint else {
        warn!("foreign key violation without a constraint name");
        return "reference";
    };
    const COLUMNS: [(&str, &str); 5] = [
        ("_assignee_id_fkey", "assignee"),
        ("_author_id_fkey", "author"),
        ("_user_id_fkey", "user"),
        ("_project_id_fkey", "project"),
        ("_issue_id_fkey", "issue"),
    ];
    COLUMNS
        .iter()
        .find(|(suffix, _)| constraint.ends_with(suffix))
        .map(|(_, field)| *field)
        .unwrap_or_else(|| {
            warn!(constraint, "unrecognised foreign key constraint");
            "reference"
        })
}
