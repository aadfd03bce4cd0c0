use chrono::{DateTime, Duration, Utc};
use invport_common::types::InventoryItemRecord;
use serde::{Deserialize, Serialize};

/// Alert severity, ranked {high: 3, medium: 2, low: 1} for feed ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    High,
    Medium,
    Low,
}

impl AlertSeverity {
    pub fn rank(self) -> u8 {
        match self {
            AlertSeverity::High => 3,
            AlertSeverity::Medium => 2,
            AlertSeverity::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warranty,
    Maintenance,
}

/// Trimmed item reference carried by an alert.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AlertItemRef {
    pub id: String,
    pub name: Option<String>,
    pub model: Option<String>,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub item: AlertItemRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_in_maintenance: Option<i64>,
}

fn item_ref(item: &InventoryItemRecord) -> AlertItemRef {
    AlertItemRef {
        id: item.id.clone(),
        name: item.name.clone(),
        model: item.model.clone(),
        location: format!("{} - {}", item.building, item.room),
    }
}

/// Warranty alerts for items whose expiry falls inside the caller's window
/// (normally `[now, now+30d)`). Severity is high at 7 or fewer days out,
/// medium otherwise.
pub fn warranty_alerts(items: &[InventoryItemRecord], now: DateTime<Utc>) -> Vec<Alert> {
    items
        .iter()
        .filter_map(|item| {
            let expiry = item.warranty_expiry?;
            let days_until_expiry =
                ((expiry - now).num_seconds().max(0) as u64).div_ceil(86_400) as i64;
            let severity = if days_until_expiry <= 7 {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            };
            Some(Alert {
                kind: AlertKind::Warranty,
                severity,
                title: "Warranty Expiring Soon".to_string(),
                message: format!(
                    "{} warranty expires in {} days",
                    item.display_name(),
                    days_until_expiry
                ),
                item: item_ref(item),
                days_until_expiry: Some(days_until_expiry),
                days_in_maintenance: None,
            })
        })
        .collect()
}

/// Maintenance alerts for items currently in Maintenance status. Severity is
/// high once an item has sat in maintenance for more than 7 days since its
/// last update, low otherwise.
pub fn maintenance_alerts(items: &[InventoryItemRecord], now: DateTime<Utc>) -> Vec<Alert> {
    items
        .iter()
        .map(|item| {
            let days_in_maintenance = (now - item.updated_at).num_days().max(0);
            let severity = if days_in_maintenance > 7 {
                AlertSeverity::High
            } else {
                AlertSeverity::Low
            };
            Alert {
                kind: AlertKind::Maintenance,
                severity,
                title: "Item in Maintenance".to_string(),
                message: format!(
                    "{} has been in maintenance for {} days",
                    item.display_name(),
                    days_in_maintenance
                ),
                item: item_ref(item),
                days_until_expiry: None,
                days_in_maintenance: Some(days_in_maintenance),
            }
        })
        .collect()
}

/// Merge the per-kind alert lists and order by severity rank, descending.
/// The sort is stable, so ties keep the original per-kind order.
pub fn merge_alerts(warranty: Vec<Alert>, maintenance: Vec<Alert>) -> Vec<Alert> {
    let mut alerts = warranty;
    alerts.extend(maintenance);
    alerts.sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()));
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use invport_common::types::ItemStatus;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn make_item(name: &str, warranty: Option<DateTime<Utc>>, updated: DateTime<Utc>) -> InventoryItemRecord {
        InventoryItemRecord {
            id: name.to_string(),
            building: "Main".to_string(),
            floor: "1".to_string(),
            room: "101".to_string(),
            name: Some(name.to_string()),
            model: None,
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
            warranty_expiry: warranty,
            submitted_by: None,
            created_at: updated,
            updated_at: updated,
        }
    }

    #[test]
    fn warranty_severity_thresholds() {
        let now = fixed_now();
        let soon = make_item("soon", Some(now + Duration::days(5)), now);
        let later = make_item("later", Some(now + Duration::days(20)), now);
        let alerts = warranty_alerts(&[soon, later], now);
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert_eq!(alerts[0].days_until_expiry, Some(5));
        assert_eq!(alerts[1].severity, AlertSeverity::Medium);
        assert_eq!(alerts[1].days_until_expiry, Some(20));
        assert!(alerts[0].message.contains("expires in 5 days"));
    }

    #[test]
    fn maintenance_severity_thresholds() {
        let now = fixed_now();
        let fresh = make_item("fresh", None, now - Duration::days(2));
        let stale = make_item("stale", None, now - Duration::days(10));
        let alerts = maintenance_alerts(&[fresh, stale], now);
        assert_eq!(alerts[0].severity, AlertSeverity::Low);
        assert_eq!(alerts[0].days_in_maintenance, Some(2));
        assert_eq!(alerts[1].severity, AlertSeverity::High);
        assert_eq!(alerts[1].days_in_maintenance, Some(10));
    }

    #[test]
    fn merged_feed_sorts_by_rank_and_keeps_tie_order() {
        let now = fixed_now();
        let warranty = warranty_alerts(
            &[
                make_item("w-high-1", Some(now + Duration::days(3)), now),
                make_item("w-med", Some(now + Duration::days(20)), now),
                make_item("w-high-2", Some(now + Duration::days(6)), now),
            ],
            now,
        );
        let maintenance = maintenance_alerts(
            &[make_item("m-high", None, now - Duration::days(30))],
            now,
        );
        let merged = merge_alerts(warranty, maintenance);

        let ranks: Vec<u8> = merged.iter().map(|a| a.severity.rank()).collect();
        assert_eq!(ranks, vec![3, 3, 3, 2]);
        // Stable: warranty highs keep their relative order and precede the
        // maintenance high that was appended after them.
        let ids: Vec<&str> = merged.iter().map(|a| a.item.id.as_str()).collect();
        assert_eq!(ids, vec!["w-high-1", "w-high-2", "m-high", "w-med"]);
    }

    #[test]
    fn expiry_in_the_past_clamps_to_zero_days() {
        let now = fixed_now();
        let expired = make_item("old", Some(now - Duration::days(1)), now);
        let alerts = warranty_alerts(&[expired], now);
        assert_eq!(alerts[0].days_until_expiry, Some(0));
        assert_eq!(alerts[0].severity, AlertSeverity::High);
    }
}
