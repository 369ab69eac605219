//! Postgres connection pool (feature `database`).

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Pool wrapper handed to the Postgres-backed producto service.
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
