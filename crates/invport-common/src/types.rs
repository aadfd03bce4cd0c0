use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an inventory item.
///
/// Serialized with the display spellings the dashboard expects
/// (`"In Use"`, `"Expiring Soon"`, ...).
///
/// # Examples
///
/// ```
/// use invport_common::types::ItemStatus;
///
/// let status: ItemStatus = "In Use".parse().unwrap();
/// assert_eq!(status, ItemStatus::InUse);
/// assert_eq!(status.to_string(), "In Use");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ItemStatus {
    Available,
    #[serde(rename = "In Use")]
    InUse,
    Maintenance,
    #[serde(rename = "Expiring Soon")]
    ExpiringSoon,
    Retired,
}

impl ItemStatus {
    /// The full fixed set of statuses, in reporting order. Status breakdowns
    /// are zero-filled over this set so absent statuses still appear.
    pub const ALL: [ItemStatus; 5] = [
        ItemStatus::Available,
        ItemStatus::InUse,
        ItemStatus::Maintenance,
        ItemStatus::ExpiringSoon,
        ItemStatus::Retired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "Available",
            ItemStatus::InUse => "In Use",
            ItemStatus::Maintenance => "Maintenance",
            ItemStatus::ExpiringSoon => "Expiring Soon",
            ItemStatus::Retired => "Retired",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(ItemStatus::Available),
            "In Use" => Ok(ItemStatus::InUse),
            "Maintenance" => Ok(ItemStatus::Maintenance),
            "Expiring Soon" => Ok(ItemStatus::ExpiringSoon),
            "Retired" => Ok(ItemStatus::Retired),
            _ => Err(format!("unknown item status: {s}")),
        }
    }
}

impl Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::Available
    }
}

/// Account role for role-gated access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Ojt,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Ojt => "ojt",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "ojt" => Ok(Role::Ojt),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Ojt
    }
}

/// One physical IT asset (full record from the inventory_items table).
///
/// Wire field names are camelCase because the dashboard consumes them
/// directly. The human-readable location string is derived at read time via
/// [`InventoryItemRecord::location`], never stored.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemRecord {
    pub id: String,
    // Location (required)
    pub building: String,
    pub floor: String,
    pub room: String,
    // Device attributes (optional free text)
    pub name: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub operating_system: Option<String>,
    pub processor: Option<String>,
    pub memory: Option<String>,
    pub storage: Option<String>,
    // Peripherals
    pub monitor: Option<String>,
    pub keyboard: Option<String>,
    pub mouse: Option<String>,
    pub other_peripherals: Option<String>,
    // Structured attributes promoted out of the legacy notes encoding
    pub room_type: Option<String>,
    pub computer_type: Option<String>,
    pub brand: Option<String>,
    pub remarks: Option<String>,
    pub notes: Option<String>,
    /// Raw cost string; coerced to a number only inside cost aggregation.
    pub cost: Option<String>,
    pub status: ItemStatus,
    pub purchase_date: Option<DateTime<Utc>>,
    pub warranty_expiry: Option<DateTime<Utc>>,
    pub submitted_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItemRecord {
    /// Human-readable location string composed from building, floor and room.
    pub fn location(&self) -> String {
        format!("{} - Floor {} - {}", self.building, self.floor, self.room)
    }

    /// Display name for alerts and report rows: the device name when present,
    /// otherwise the model, otherwise a placeholder.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.model.as_deref())
            .unwrap_or("Unnamed Device")
    }
}

/// An account with role-based access.
///
/// The password hash never leaves the server: it is skipped on
/// serialization and defaulted on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---- Request payloads ----

/// Create/submit payload for an inventory item. `submitted_by` is stamped
/// server-side from the authenticated user, never taken from the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub building: String,
    pub floor: String,
    pub room: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub operating_system: Option<String>,
    #[serde(default)]
    pub processor: Option<String>,
    #[serde(default)]
    pub memory: Option<String>,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub monitor: Option<String>,
    #[serde(default)]
    pub keyboard: Option<String>,
    #[serde(default)]
    pub mouse: Option<String>,
    #[serde(default)]
    pub other_peripherals: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub computer_type: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub warranty_expiry: Option<DateTime<Utc>>,
}

/// Partial-update payload for an inventory item. Absent fields are left
/// untouched; `updated_at` refreshes on every accepted update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub operating_system: Option<String>,
    #[serde(default)]
    pub processor: Option<String>,
    #[serde(default)]
    pub memory: Option<String>,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub monitor: Option<String>,
    #[serde(default)]
    pub keyboard: Option<String>,
    #[serde(default)]
    pub mouse: Option<String>,
    #[serde(default)]
    pub other_peripherals: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub computer_type: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub warranty_expiry: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Update payload for a user. The password is intentionally absent: it is
/// never updated through the general update path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_status_round_trips_display_spellings() {
        for status in ItemStatus::ALL {
            let parsed: ItemStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("in use".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn item_status_serde_uses_display_spellings() {
        let json = serde_json::to_string(&ItemStatus::ExpiringSoon).unwrap();
        assert_eq!(json, "\"Expiring Soon\"");
        let back: ItemStatus = serde_json::from_str("\"In Use\"").unwrap();
        assert_eq!(back, ItemStatus::InUse);
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User {
            id: "1".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            role: Role::Admin,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn location_is_composed_from_parts() {
        let record = InventoryItemRecord {
            id: "1".to_string(),
            building: "Main".to_string(),
            floor: "3".to_string(),
            room: "Lab 301".to_string(),
            name: None,
            model: Some("OptiPlex".to_string()),
            serial_number: None,
            category: None,
            operating_system: None,
            processor: None,
            memory: None,
            storage: None,
            monitor: None,
            keyboard: None,
            mouse: None,
            other_peripherals: None,
            room_type: None,
            computer_type: None,
            brand: None,
            remarks: None,
            notes: None,
            cost: None,
            status: ItemStatus::Available,
            purchase_date: None,
            warranty_expiry: None,
            submitted_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(record.location(), "Main - Floor 3 - Lab 301");
        assert_eq!(record.display_name(), "OptiPlex");
    }
}
