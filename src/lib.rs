//! Server-rendered CRUD catalog for productos.
//!
//! Layered like a small web application: `app` holds the feature code
//! (models, handlers, views, the service seam), `core` the shared error
//! and response machinery, `infrastructure` the config, logging and
//! upload-storage plumbing.

pub mod app;
pub mod core;
pub mod infrastructure;

pub use crate::app::build_router;
pub use crate::app::producto::handler::AppState;
pub use crate::core::error::CoreError;
