use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m001_initial_schema"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(UP_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await?;
        Ok(())
    }
}

const UP_SQL: &str = "
PRAGMA journal_mode=WAL;

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'ojt',
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);

CREATE TABLE IF NOT EXISTS inventory_items (
    id TEXT PRIMARY KEY NOT NULL,
    building TEXT NOT NULL,
    floor TEXT NOT NULL,
    room TEXT NOT NULL,
    name TEXT,
    model TEXT,
    serial_number TEXT,
    category TEXT,
    operating_system TEXT,
    processor TEXT,
    memory TEXT,
    storage TEXT,
    monitor TEXT,
    keyboard TEXT,
    mouse TEXT,
    other_peripherals TEXT,
    room_type TEXT,
    computer_type TEXT,
    brand TEXT,
    remarks TEXT,
    notes TEXT,
    cost TEXT,
    status TEXT NOT NULL DEFAULT 'Available',
    purchase_date TEXT,
    warranty_expiry TEXT,
    submitted_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Sparse uniqueness: serial numbers must be unique, but any number of rows
-- may omit one. The store normalizes empty strings to NULL before insert.
CREATE UNIQUE INDEX IF NOT EXISTS idx_items_serial_number
    ON inventory_items(serial_number) WHERE serial_number IS NOT NULL;

CREATE INDEX IF NOT EXISTS idx_items_status ON inventory_items(status);
CREATE INDEX IF NOT EXISTS idx_items_building ON inventory_items(building);
CREATE INDEX IF NOT EXISTS idx_items_created_at ON inventory_items(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_items_updated_at ON inventory_items(updated_at DESC);
CREATE INDEX IF NOT EXISTS idx_items_warranty_expiry ON inventory_items(warranty_expiry);
";

const DOWN_SQL: &str = "
DROP TABLE IF EXISTS inventory_items;
DROP TABLE IF EXISTS users;
";
