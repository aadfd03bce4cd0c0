//! Persistence layer for the inventory portal.
//!
//! All access goes through [`store::InventoryStore`], a SeaORM wrapper over a
//! single SQLite database (WAL mode) holding the `inventory_items` and
//! `users` tables. Migrations run automatically on connect.

pub mod auth;
pub mod entities;
pub mod store;

#[cfg(test)]
mod tests;

pub use sea_orm::Order;
pub use store::{
    BuildingCount, CategoryCostRow, FloorCount, InventoryStore, ItemFilter, SortField,
    StatusCount,
};
