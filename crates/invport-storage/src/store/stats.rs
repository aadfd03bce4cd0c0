use anyhow::Result;
use chrono::{DateTime, Utc};
use invport_common::types::{InventoryItemRecord, ItemStatus};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entities::inventory_item::{Column, Entity};
use crate::store::inventory::to_record;
use crate::store::InventoryStore;

/// Per-status item count (raw group-by row; zero-filling over the full status
/// set happens in the report shaping).
#[derive(Debug, Clone, FromQueryResult, serde::Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Per-building item count, ordered descending by count.
#[derive(Debug, Clone, FromQueryResult, serde::Serialize)]
pub struct BuildingCount {
    pub building: String,
    pub count: i64,
}

/// Per-(building, floor) item count.
#[derive(Debug, Clone, FromQueryResult, serde::Serialize)]
pub struct FloorCount {
    pub building: String,
    pub floor: String,
    pub count: i64,
}

/// Category + raw cost projection for the category/cost analytics.
#[derive(Debug, Clone, FromQueryResult)]
pub struct CategoryCostRow {
    pub category: Option<String>,
    pub cost: Option<String>,
}

impl InventoryStore {
    pub async fn count_all_items(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }

    pub async fn count_items_by_status(&self) -> Result<Vec<StatusCount>> {
        let rows = Entity::find()
            .select_only()
            .column(Column::Status)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::Status)
            .into_model::<StatusCount>()
            .all(self.db())
            .await?;
        Ok(rows)
    }

    pub async fn count_items_by_building(&self) -> Result<Vec<BuildingCount>> {
        let rows = Entity::find()
            .select_only()
            .column(Column::Building)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::Building)
            .order_by_desc(Column::Id.count())
            .into_model::<BuildingCount>()
            .all(self.db())
            .await?;
        Ok(rows)
    }

    pub async fn count_items_by_floor(&self) -> Result<Vec<FloorCount>> {
        let rows = Entity::find()
            .select_only()
            .column(Column::Building)
            .column(Column::Floor)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::Building)
            .group_by(Column::Floor)
            .order_by(Column::Building, Order::Asc)
            .order_by(Column::Floor, Order::Asc)
            .into_model::<FloorCount>()
            .all(self.db())
            .await?;
        Ok(rows)
    }

    pub async fn count_items_created_since(&self, since: DateTime<Utc>) -> Result<u64> {
        Ok(Entity::find()
            .filter(Column::CreatedAt.gte(since.fixed_offset()))
            .count(self.db())
            .await?)
    }

    pub async fn count_items_updated_since(&self, since: DateTime<Utc>) -> Result<u64> {
        Ok(Entity::find()
            .filter(Column::UpdatedAt.gte(since.fixed_offset()))
            .count(self.db())
            .await?)
    }

    /// Count of items whose warranty expiry falls in the half-open window
    /// `[from, to)`. Either bound may be omitted; rows with no expiry never
    /// match.
    pub async fn count_items_with_warranty_in(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<u64> {
        let mut q = Entity::find().filter(Column::WarrantyExpiry.is_not_null());
        if let Some(from) = from {
            q = q.filter(Column::WarrantyExpiry.gte(from.fixed_offset()));
        }
        if let Some(to) = to {
            q = q.filter(Column::WarrantyExpiry.lt(to.fixed_offset()));
        }
        Ok(q.count(self.db()).await?)
    }

    /// Count of items whose purchase date falls in the half-open window
    /// `[from, to)`.
    pub async fn count_items_purchased_in(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<u64> {
        let mut q = Entity::find().filter(Column::PurchaseDate.is_not_null());
        if let Some(from) = from {
            q = q.filter(Column::PurchaseDate.gte(from.fixed_offset()));
        }
        if let Some(to) = to {
            q = q.filter(Column::PurchaseDate.lt(to.fixed_offset()));
        }
        Ok(q.count(self.db()).await?)
    }

    /// Creation timestamps of items created at or after `since`, for the
    /// monthly histogram (bucketing happens in the report crate with an
    /// injected clock).
    pub async fn created_at_values_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>> {
        let rows: Vec<sea_orm::prelude::DateTimeWithTimeZone> = Entity::find()
            .select_only()
            .column(Column::CreatedAt)
            .filter(Column::CreatedAt.gte(since.fixed_offset()))
            .into_tuple()
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(|d| d.with_timezone(&Utc)).collect())
    }

    /// Warranty expiry timestamps of every item that has one, for the
    /// warranty bucket analytics.
    pub async fn warranty_expiry_values(&self) -> Result<Vec<DateTime<Utc>>> {
        let rows: Vec<sea_orm::prelude::DateTimeWithTimeZone> = Entity::find()
            .select_only()
            .column(Column::WarrantyExpiry)
            .filter(Column::WarrantyExpiry.is_not_null())
            .into_tuple()
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(|d| d.with_timezone(&Utc)).collect())
    }

    /// Purchase dates of every item that has one, for the age distribution.
    pub async fn purchase_date_values(&self) -> Result<Vec<DateTime<Utc>>> {
        let rows: Vec<sea_orm::prelude::DateTimeWithTimeZone> = Entity::find()
            .select_only()
            .column(Column::PurchaseDate)
            .filter(Column::PurchaseDate.is_not_null())
            .into_tuple()
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(|d| d.with_timezone(&Utc)).collect())
    }

    /// Raw cost strings of all items that have one. Parsing and exclusion of
    /// unparseable values is the report crate's concern.
    pub async fn cost_values(&self) -> Result<Vec<String>> {
        let rows: Vec<Option<String>> = Entity::find()
            .select_only()
            .column(Column::Cost)
            .filter(Column::Cost.is_not_null())
            .into_tuple()
            .all(self.db())
            .await?;
        Ok(rows.into_iter().flatten().collect())
    }

    pub async fn category_cost_rows(&self) -> Result<Vec<CategoryCostRow>> {
        let rows = Entity::find()
            .select_only()
            .column(Column::Category)
            .column(Column::Cost)
            .into_model::<CategoryCostRow>()
            .all(self.db())
            .await?;
        Ok(rows)
    }

    pub async fn recently_updated_items(&self, limit: u64) -> Result<Vec<InventoryItemRecord>> {
        let rows = Entity::find()
            .order_by_desc(Column::UpdatedAt)
            .limit(limit)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_record).collect())
    }

    pub async fn recently_created_items(&self, limit: u64) -> Result<Vec<InventoryItemRecord>> {
        let rows = Entity::find()
            .order_by_desc(Column::CreatedAt)
            .limit(limit)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_record).collect())
    }

    /// Items whose warranty expires in the half-open window `[from, to)`,
    /// for the warranty alerts feed.
    pub async fn items_with_warranty_in(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<InventoryItemRecord>> {
        let rows = Entity::find()
            .filter(Column::WarrantyExpiry.gte(from.fixed_offset()))
            .filter(Column::WarrantyExpiry.lt(to.fixed_offset()))
            .order_by(Column::WarrantyExpiry, Order::Asc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_record).collect())
    }

    pub async fn items_in_maintenance(&self) -> Result<Vec<InventoryItemRecord>> {
        let rows = Entity::find()
            .filter(Column::Status.eq(ItemStatus::Maintenance.as_str()))
            .order_by(Column::UpdatedAt, Order::Asc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_record).collect())
    }

    /// Every item, newest first (the CSV export order).
    pub async fn all_items_newest_first(&self) -> Result<Vec<InventoryItemRecord>> {
        let rows = Entity::find()
            .order_by_desc(Column::CreatedAt)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_record).collect())
    }
}
