//! Application layer: features and router construction.

pub mod producto;

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::core::middleware::request_logging_middleware;
use producto::handler::{self, AppState};

/// Wire every route to its handler. Kept separate from `main` so the
/// test suite can drive the router directly.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::listar))
        .route("/listar", get(handler::listar))
        .route("/ver/:id", get(handler::ver))
        .route("/form", get(handler::crear).post(handler::guardar))
        .route("/form/:id", get(handler::editar))
        .route("/form-v2/:id", get(handler::editar_v2))
        .route("/eliminar/:id", get(handler::eliminar))
        .route("/uploads/img/:filename", get(handler::ver_foto))
        .route("/listar-datadriver", get(handler::listar_data_driver))
        .route("/listar-full", get(handler::listar_full))
        .route("/listar-chunked", get(handler::listar_chunked))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
