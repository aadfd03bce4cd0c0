use anyhow::Result;
use chrono::Utc;
use invport_common::types::{CreateItemRequest, InventoryItemRecord, UpdateItemRequest};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::inventory_item::{self, Column, Entity};
use crate::store::InventoryStore;

/// Filter parameters for the inventory listing. All fields combine with AND;
/// the free-text search is itself an OR across name, model, building, room
/// and serial number.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub search: Option<String>,
    pub building: Option<String>,
    /// Exact-match status filter, kept as a raw string on purpose: an
    /// unrecognized value matches nothing instead of erroring.
    pub status: Option<String>,
}

/// Whitelisted sort fields for the inventory listing.
///
/// The query parameter uses the wire (camelCase) spellings; anything outside
/// this set is a validation error rather than being passed through to the
/// store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Model,
    SerialNumber,
    Building,
    Floor,
    Room,
    Status,
    Category,
    PurchaseDate,
    WarrantyExpiry,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "name" => Some(SortField::Name),
            "model" => Some(SortField::Model),
            "serialNumber" => Some(SortField::SerialNumber),
            "building" => Some(SortField::Building),
            "floor" => Some(SortField::Floor),
            "room" => Some(SortField::Room),
            "status" => Some(SortField::Status),
            "category" => Some(SortField::Category),
            "purchaseDate" => Some(SortField::PurchaseDate),
            "warrantyExpiry" => Some(SortField::WarrantyExpiry),
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    fn column(self) -> Column {
        match self {
            SortField::Name => Column::Name,
            SortField::Model => Column::Model,
            SortField::SerialNumber => Column::SerialNumber,
            SortField::Building => Column::Building,
            SortField::Floor => Column::Floor,
            SortField::Room => Column::Room,
            SortField::Status => Column::Status,
            SortField::Category => Column::Category,
            SortField::PurchaseDate => Column::PurchaseDate,
            SortField::WarrantyExpiry => Column::WarrantyExpiry,
            SortField::CreatedAt => Column::CreatedAt,
            SortField::UpdatedAt => Column::UpdatedAt,
        }
    }
}

impl Default for SortField {
    fn default() -> Self {
        SortField::CreatedAt
    }
}

pub(crate) fn to_record(m: inventory_item::Model) -> InventoryItemRecord {
    InventoryItemRecord {
        id: m.id,
        building: m.building,
        floor: m.floor,
        room: m.room,
        name: m.name,
        model: m.model,
        serial_number: m.serial_number,
        category: m.category,
        operating_system: m.operating_system,
        processor: m.processor,
        memory: m.memory,
        storage: m.storage,
        monitor: m.monitor,
        keyboard: m.keyboard,
        mouse: m.mouse,
        other_peripherals: m.other_peripherals,
        room_type: m.room_type,
        computer_type: m.computer_type,
        brand: m.brand,
        remarks: m.remarks,
        notes: m.notes,
        cost: m.cost,
        status: m.status.parse().unwrap_or_default(),
        purchase_date: m.purchase_date.map(|d| d.with_timezone(&Utc)),
        warranty_expiry: m.warranty_expiry.map(|d| d.with_timezone(&Utc)),
        submitted_by: m.submitted_by,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

/// Empty serial numbers are stored as NULL so the partial unique index only
/// applies to real values.
fn normalize_serial(serial: Option<&str>) -> Option<String> {
    serial
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn filter_condition(filter: &ItemFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(term) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        cond = cond.add(
            Condition::any()
                .add(Column::Name.contains(term))
                .add(Column::Model.contains(term))
                .add(Column::Building.contains(term))
                .add(Column::Room.contains(term))
                .add(Column::SerialNumber.contains(term)),
        );
    }
    if let Some(building) = filter.building.as_deref().filter(|s| !s.is_empty()) {
        cond = cond.add(Column::Building.eq(building));
    }
    if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
        cond = cond.add(Column::Status.eq(status));
    }
    cond
}

impl InventoryStore {
    pub async fn insert_item(
        &self,
        req: &CreateItemRequest,
        submitted_by: &str,
    ) -> Result<InventoryItemRecord> {
        let id = invport_common::id::next_id();
        let now = Utc::now().fixed_offset();
        let am = inventory_item::ActiveModel {
            id: Set(id),
            building: Set(req.building.clone()),
            floor: Set(req.floor.clone()),
            room: Set(req.room.clone()),
            name: Set(req.name.clone()),
            model: Set(req.model.clone()),
            serial_number: Set(normalize_serial(req.serial_number.as_deref())),
            category: Set(req.category.clone()),
            operating_system: Set(req.operating_system.clone()),
            processor: Set(req.processor.clone()),
            memory: Set(req.memory.clone()),
            storage: Set(req.storage.clone()),
            monitor: Set(req.monitor.clone()),
            keyboard: Set(req.keyboard.clone()),
            mouse: Set(req.mouse.clone()),
            other_peripherals: Set(req.other_peripherals.clone()),
            room_type: Set(req.room_type.clone()),
            computer_type: Set(req.computer_type.clone()),
            brand: Set(req.brand.clone()),
            remarks: Set(req.remarks.clone()),
            notes: Set(req.notes.clone()),
            cost: Set(req.cost.clone()),
            status: Set(req.status.unwrap_or_default().as_str().to_string()),
            purchase_date: Set(req.purchase_date.map(|d| d.fixed_offset())),
            warranty_expiry: Set(req.warranty_expiry.map(|d| d.fixed_offset())),
            submitted_by: Set(Some(submitted_by.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = am.insert(self.db()).await?;
        Ok(to_record(model))
    }

    pub async fn get_item(&self, id: &str) -> Result<Option<InventoryItemRecord>> {
        let model = Entity::find_by_id(id).one(self.db()).await?;
        Ok(model.map(to_record))
    }

    /// Paginated listing: filters and search apply before sort, sort before
    /// the skip/limit window.
    pub async fn list_items(
        &self,
        filter: &ItemFilter,
        sort_by: SortField,
        order: Order,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<InventoryItemRecord>> {
        let rows = Entity::find()
            .filter(filter_condition(filter))
            .order_by(sort_by.column(), order)
            .limit(limit)
            .offset(offset)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_record).collect())
    }

    /// Count of all records matching filters + search, before pagination.
    pub async fn count_items(&self, filter: &ItemFilter) -> Result<u64> {
        Ok(Entity::find()
            .filter(filter_condition(filter))
            .count(self.db())
            .await?)
    }

    /// Partial update; absent fields are left untouched. Returns `None` when
    /// the item does not exist. Any accepted update refreshes `updated_at`.
    pub async fn update_item(
        &self,
        id: &str,
        req: &UpdateItemRequest,
    ) -> Result<Option<InventoryItemRecord>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let mut am: inventory_item::ActiveModel = model.into();
        if let Some(v) = &req.building {
            am.building = Set(v.clone());
        }
        if let Some(v) = &req.floor {
            am.floor = Set(v.clone());
        }
        if let Some(v) = &req.room {
            am.room = Set(v.clone());
        }
        if let Some(v) = &req.name {
            am.name = Set(Some(v.clone()));
        }
        if let Some(v) = &req.model {
            am.model = Set(Some(v.clone()));
        }
        if let Some(v) = &req.serial_number {
            am.serial_number = Set(normalize_serial(Some(v)));
        }
        if let Some(v) = &req.category {
            am.category = Set(Some(v.clone()));
        }
        if let Some(v) = &req.operating_system {
            am.operating_system = Set(Some(v.clone()));
        }
        if let Some(v) = &req.processor {
            am.processor = Set(Some(v.clone()));
        }
        if let Some(v) = &req.memory {
            am.memory = Set(Some(v.clone()));
        }
        if let Some(v) = &req.storage {
            am.storage = Set(Some(v.clone()));
        }
        if let Some(v) = &req.monitor {
            am.monitor = Set(Some(v.clone()));
        }
        if let Some(v) = &req.keyboard {
            am.keyboard = Set(Some(v.clone()));
        }
        if let Some(v) = &req.mouse {
            am.mouse = Set(Some(v.clone()));
        }
        if let Some(v) = &req.other_peripherals {
            am.other_peripherals = Set(Some(v.clone()));
        }
        if let Some(v) = &req.room_type {
            am.room_type = Set(Some(v.clone()));
        }
        if let Some(v) = &req.computer_type {
            am.computer_type = Set(Some(v.clone()));
        }
        if let Some(v) = &req.brand {
            am.brand = Set(Some(v.clone()));
        }
        if let Some(v) = &req.remarks {
            am.remarks = Set(Some(v.clone()));
        }
        if let Some(v) = &req.notes {
            am.notes = Set(Some(v.clone()));
        }
        if let Some(v) = &req.cost {
            am.cost = Set(Some(v.clone()));
        }
        if let Some(v) = req.status {
            am.status = Set(v.as_str().to_string());
        }
        if let Some(v) = req.purchase_date {
            am.purchase_date = Set(Some(v.fixed_offset()));
        }
        if let Some(v) = req.warranty_expiry {
            am.warranty_expiry = Set(Some(v.fixed_offset()));
        }
        am.updated_at = Set(Utc::now().fixed_offset());
        let updated = am.update(self.db()).await?;
        Ok(Some(to_record(updated)))
    }

    pub async fn delete_item(&self, id: &str) -> Result<bool> {
        let res = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected > 0)
    }
}
