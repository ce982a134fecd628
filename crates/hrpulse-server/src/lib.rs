//! Library surface of the server binary, exposed for integration tests.

pub mod error;
pub mod routes;
pub mod state;
