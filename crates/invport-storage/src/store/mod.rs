use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

pub mod inventory;
pub mod stats;
pub mod user;

pub use inventory::{ItemFilter, SortField};
pub use stats::{BuildingCount, CategoryCostRow, FloorCount, StatusCount};

/// Unified access layer for the portal database.
///
/// Every method is an `async fn` over SeaORM. A single store instance is
/// shared across all request handlers behind an `Arc`.
pub struct InventoryStore {
    pub(crate) db: DatabaseConnection,
}

impl InventoryStore {
    /// Connect to the database and bring the schema up to date.
    ///
    /// `db_url` is a full connection URL, e.g.
    /// `sqlite:///data/invport.db?mode=rwc`. WAL mode is enabled for SQLite
    /// so concurrent reads do not block behind writes.
    pub async fn connect(db_url: &str) -> Result<Self> {
        let db = Database::connect(db_url).await?;

        if db_url.starts_with("sqlite://") {
            db.execute_unprepared("PRAGMA journal_mode=WAL;").await?;
        }

        Migrator::up(&db, None).await?;

        tracing::info!(db_url = %db_url, "Initialized inventory store");

        Ok(Self { db })
    }

    /// Underlying connection reference, for the store submodules.
    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
