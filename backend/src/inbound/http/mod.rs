//! HTTP inbound adapter exposing the REST API.

pub mod choices;
pub mod comments;
pub mod contributors;
pub mod error;
pub mod health;
pub mod issues;
pub mod projects;
pub mod routes;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
