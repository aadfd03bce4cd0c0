use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub building: String,
    pub floor: String,
    pub room: String,
    pub name: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub operating_system: Option<String>,
    pub processor: Option<String>,
    pub memory: Option<String>,
    pub storage: Option<String>,
    pub monitor: Option<String>,
    pub keyboard: Option<String>,
    pub mouse: Option<String>,
    pub other_peripherals: Option<String>,
    pub room_type: Option<String>,
    pub computer_type: Option<String>,
    pub brand: Option<String>,
    pub remarks: Option<String>,
    pub notes: Option<String>,
    pub cost: Option<String>,
    pub status: String,
    pub purchase_date: Option<DateTimeWithTimeZone>,
    pub warranty_expiry: Option<DateTimeWithTimeZone>,
    pub submitted_by: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
