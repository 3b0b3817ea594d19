//! Errors shared by the project, contributor, issue and comment repositories.

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by tracker repository adapters.
    pub enum TrackerPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "tracker repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "tracker repository query failed: {message}",
        /// The (user, project) membership already exists.
        DuplicateContributor => "user is already a contributor of this project",
        /// A referenced row (user, project or issue) does not exist.
        MissingReference { entity: String } => "referenced {entity} does not exist",
    }
}
