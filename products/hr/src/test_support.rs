use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect};

/// Single-connection in-memory SQLite store with the real schema applied.
pub async fn memory_pool() -> DbPool {
    let settings = DatabaseSettings::new("sqlite::memory:").with_max_connections(1);
    let pool = connect(&settings).await.unwrap();
    Migrator::up(&pool, None).await.unwrap();
    pool
}
