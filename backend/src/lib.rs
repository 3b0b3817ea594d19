//! Project and issue tracking backend.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the entities, the
//! authorization gate and the services; [`inbound`] adapts HTTP requests onto
//! the driving ports; [`outbound`] implements the driven repository ports for
//! PostgreSQL and for an in-process store.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
