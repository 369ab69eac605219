//! Core layer: error taxonomy, response helpers and middleware.

pub mod error;
pub mod middleware;
pub mod response;
