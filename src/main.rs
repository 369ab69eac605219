//! Application entry point.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use producto_web::app::producto::service::{InMemoryProductoService, ProductoService};
use producto_web::infrastructure::{config::AppConfig, logger::Logger, storage::UploadStore};
use producto_web::{build_router, AppState};

#[cfg(feature = "database")]
async fn build_service(
    config: &AppConfig,
) -> Result<Arc<dyn ProductoService>, Box<dyn std::error::Error>> {
    use producto_web::app::producto::service::PgProductoService;
    use producto_web::infrastructure::database::Database;

    match &config.database_url {
        Some(url) => {
            let db = Database::connect(url).await?;
            info!("usando el servicio de productos sobre Postgres");
            Ok(Arc::new(PgProductoService::new(db.pool().clone())))
        }
        None => Ok(Arc::new(InMemoryProductoService::with_sample_data())),
    }
}

#[cfg(not(feature = "database"))]
async fn build_service(
    _config: &AppConfig,
) -> Result<Arc<dyn ProductoService>, Box<dyn std::error::Error>> {
    Ok(Arc::new(InMemoryProductoService::with_sample_data()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    Logger::init();

    let config = AppConfig::load()?;
    tokio::fs::create_dir_all(&config.uploads.path).await?;

    let state = AppState {
        service: build_service(&config).await?,
        store: UploadStore::new(&config.uploads.path),
    };
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, uploads = %config.uploads.path, "servidor iniciado");

    axum::serve(listener, app).await?;
    Ok(())
}
