//! Outbound adapters implementing the domain's repository ports.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel.
//! - **memory**: process-local tables for database-less runs and tests.
//!
//! Adapters only translate between domain types and storage
//! representations; they contain no business logic.

pub mod memory;
pub mod persistence;
