//! Persistence gateway: connection pool, configuration, and migrations.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Versioned migrations embedded from `crates/db/migrations`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
}

impl DbConfig {
    /// Resolve the connection string from the environment.
    ///
    /// `DATABASE_URL` wins; when unset the URL is composed from discrete
    /// variables with local-development defaults:
    ///
    /// | Env Var       | Default     |
    /// |---------------|-------------|
    /// | `DB_HOST`     | `localhost` |
    /// | `DB_PORT`     | `5432`      |
    /// | `DB_USER`     | `parc`      |
    /// | `DB_PASSWORD` | `parc`      |
    /// | `DB_NAME`     | `parc`      |
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            let host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".into());
            let port = std::env::var("DB_PORT").unwrap_or_else(|_| "5432".into());
            let user = std::env::var("DB_USER").unwrap_or_else(|_| "parc".into());
            let password = std::env::var("DB_PASSWORD").unwrap_or_else(|_| "parc".into());
            let name = std::env::var("DB_NAME").unwrap_or_else(|_| "parc".into());
            format!("postgres://{user}:{password}@{host}:{port}/{name}")
        });
        Self { url }
    }
}

/// Create a connection pool without probing the server.
///
/// Connections are established lazily so the HTTP listener can start even
/// when the database is down; reachability is reported separately by
/// [`health_check`].
pub fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(&config.url)
}

/// Probe the database with a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Apply all pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
