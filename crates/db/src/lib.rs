//! Document persistence: the store trait, its two backends, live queries,
//! document models and per-collection repositories.

use sqlx::postgres::PgPoolOptions;

pub mod collections;
pub mod document;
pub mod error;
pub mod live;
pub mod models;
pub mod query;
pub mod repositories;
pub mod store;

pub use document::{Document, Fields};
pub use error::StoreError;
pub use live::{LiveQuery, Snapshot, Subscription};
pub use query::{Condition, Direction, Query};
pub use store::{ChangeKind, CollectionChange, DocumentStore, MemoryDocumentStore, PgDocumentStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a lightweight connectivity check against the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the bundled migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
