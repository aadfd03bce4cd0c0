use crate::store::{InventoryStore, ItemFilter, SortField};
use chrono::{Duration, Utc};
use invport_common::types::{CreateItemRequest, CreateUserRequest, ItemStatus, Role, UpdateItemRequest};
use sea_orm::Order;
use tempfile::TempDir;

async fn setup() -> (TempDir, InventoryStore) {
    invport_common::id::init(1, 1);
    let dir = TempDir::new().unwrap();
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("invport.db").display());
    let store = InventoryStore::connect(&db_url).await.unwrap();
    (dir, store)
}

fn make_item(name: &str, building: &str, status: ItemStatus) -> CreateItemRequest {
    CreateItemRequest {
        building: building.to_string(),
        floor: "1".to_string(),
        room: "101".to_string(),
        name: Some(name.to_string()),
        status: Some(status),
        ..Default::default()
    }
}

#[tokio::test]
async fn insert_and_get_item() {
    let (_dir, store) = setup().await;

    let created = store
        .insert_item(&make_item("PC-001", "Main", ItemStatus::Available), "admin")
        .await
        .unwrap();
    assert_eq!(created.submitted_by.as_deref(), Some("admin"));
    assert_eq!(created.status, ItemStatus::Available);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = store.get_item(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name.as_deref(), Some("PC-001"));
    assert_eq!(fetched.location(), "Main - Floor 1 - 101");

    assert!(store.get_item("999999").await.unwrap().is_none());
}

#[tokio::test]
async fn serial_number_uniqueness_is_sparse() {
    let (_dir, store) = setup().await;

    let mut req = make_item("PC-001", "Main", ItemStatus::Available);
    req.serial_number = Some("SN-123".to_string());
    store.insert_item(&req, "admin").await.unwrap();

    // Same non-empty serial: rejected by the partial unique index.
    let mut dup = make_item("PC-002", "Main", ItemStatus::Available);
    dup.serial_number = Some("SN-123".to_string());
    let err = store.insert_item(&dup, "admin").await.unwrap_err();
    assert!(err.to_string().contains("UNIQUE constraint"));

    // Empty/absent serials normalize to NULL and may repeat freely.
    let mut blank_a = make_item("PC-003", "Main", ItemStatus::Available);
    blank_a.serial_number = Some("".to_string());
    store.insert_item(&blank_a, "admin").await.unwrap();
    let blank_b = make_item("PC-004", "Main", ItemStatus::Available);
    store.insert_item(&blank_b, "admin").await.unwrap();
}

#[tokio::test]
async fn search_matches_substring_case_insensitively() {
    let (_dir, store) = setup().await;

    let mut a = make_item("LAB-PC-7", "Main", ItemStatus::Available);
    a.model = Some("Dell OptiPlex".to_string());
    store.insert_item(&a, "admin").await.unwrap();
    let mut b = make_item("OFFICE-PC-2", "Annex", ItemStatus::InUse);
    b.serial_number = Some("XK-9000".to_string());
    store.insert_item(&b, "admin").await.unwrap();

    for term in ["optiplex", "OPTI", "Dell"] {
        let filter = ItemFilter {
            search: Some(term.to_string()),
            ..Default::default()
        };
        assert_eq!(store.count_items(&filter).await.unwrap(), 1, "term {term}");
    }

    // Serial and room are part of the OR set.
    let by_serial = ItemFilter {
        search: Some("xk-90".to_string()),
        ..Default::default()
    };
    assert_eq!(store.count_items(&by_serial).await.unwrap(), 1);
    let by_room = ItemFilter {
        search: Some("101".to_string()),
        ..Default::default()
    };
    assert_eq!(store.count_items(&by_room).await.unwrap(), 2);
}

#[tokio::test]
async fn filters_combine_with_and() {
    let (_dir, store) = setup().await;

    store
        .insert_item(&make_item("A", "Main", ItemStatus::Maintenance), "admin")
        .await
        .unwrap();
    store
        .insert_item(&make_item("B", "Main", ItemStatus::Available), "admin")
        .await
        .unwrap();
    store
        .insert_item(&make_item("C", "Annex", ItemStatus::Maintenance), "admin")
        .await
        .unwrap();

    let filter = ItemFilter {
        building: Some("Main".to_string()),
        status: Some("Maintenance".to_string()),
        ..Default::default()
    };
    assert_eq!(store.count_items(&filter).await.unwrap(), 1);

    // Unrecognized status values simply match nothing.
    let bogus = ItemFilter {
        status: Some("Broken".to_string()),
        ..Default::default()
    };
    assert_eq!(store.count_items(&bogus).await.unwrap(), 0);
}

#[tokio::test]
async fn pagination_covers_the_filtered_set_without_overlap() {
    let (_dir, store) = setup().await;

    for i in 0..5 {
        store
            .insert_item(
                &make_item(&format!("PC-{i}"), "Main", ItemStatus::Available),
                "admin",
            )
            .await
            .unwrap();
    }

    let filter = ItemFilter::default();
    let mut seen = std::collections::HashSet::new();
    for page in 0..3 {
        let items = store
            .list_items(&filter, SortField::Name, Order::Asc, 2, page * 2)
            .await
            .unwrap();
        assert!(items.len() <= 2);
        for item in items {
            assert!(seen.insert(item.id), "page windows must not overlap");
        }
    }
    assert_eq!(seen.len(), 5);
}

#[tokio::test]
async fn update_applies_partial_changes_and_refreshes_updated_at() {
    let (_dir, store) = setup().await;

    let created = store
        .insert_item(&make_item("PC-001", "Main", ItemStatus::Available), "admin")
        .await
        .unwrap();

    let update = UpdateItemRequest {
        status: Some(ItemStatus::Maintenance),
        notes: Some("fan replacement pending".to_string()),
        ..Default::default()
    };
    let updated = store.update_item(&created.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.status, ItemStatus::Maintenance);
    assert_eq!(updated.building, "Main");
    assert!(updated.updated_at >= created.updated_at);

    assert!(store
        .update_item("424242", &UpdateItemRequest::default())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() {
    let (_dir, store) = setup().await;

    let created = store
        .insert_item(&make_item("PC-001", "Main", ItemStatus::Available), "admin")
        .await
        .unwrap();
    assert!(store.delete_item(&created.id).await.unwrap());
    assert!(!store.delete_item(&created.id).await.unwrap());
}

#[tokio::test]
async fn grouped_counts_by_status_and_building() {
    let (_dir, store) = setup().await;

    store
        .insert_item(&make_item("A", "Main", ItemStatus::Available), "admin")
        .await
        .unwrap();
    store
        .insert_item(&make_item("B", "Main", ItemStatus::Available), "admin")
        .await
        .unwrap();
    store
        .insert_item(&make_item("C", "Annex", ItemStatus::InUse), "admin")
        .await
        .unwrap();

    let by_status = store.count_items_by_status().await.unwrap();
    let available = by_status.iter().find(|s| s.status == "Available").unwrap();
    assert_eq!(available.count, 2);

    let by_building = store.count_items_by_building().await.unwrap();
    assert_eq!(by_building[0].building, "Main");
    assert_eq!(by_building[0].count, 2);
    assert_eq!(by_building[1].building, "Annex");

    let by_floor = store.count_items_by_floor().await.unwrap();
    assert_eq!(by_floor.len(), 2);
    assert_eq!(by_floor.iter().map(|f| f.count).sum::<i64>(), 3);
}

#[tokio::test]
async fn warranty_window_is_half_open() {
    let (_dir, store) = setup().await;
    let now = Utc::now();

    let mut at_lower = make_item("L", "Main", ItemStatus::Available);
    at_lower.warranty_expiry = Some(now);
    store.insert_item(&at_lower, "admin").await.unwrap();

    let mut at_upper = make_item("U", "Main", ItemStatus::Available);
    at_upper.warranty_expiry = Some(now + Duration::days(30));
    store.insert_item(&at_upper, "admin").await.unwrap();

    let mut none = make_item("N", "Main", ItemStatus::Available);
    none.warranty_expiry = None;
    store.insert_item(&none, "admin").await.unwrap();

    // [now, now+30d): the lower bound is included, the upper bound is not,
    // and rows without an expiry never match.
    let count = store
        .count_items_with_warranty_in(Some(now), Some(now + Duration::days(30)))
        .await
        .unwrap();
    assert_eq!(count, 1);

    let expired = store
        .count_items_with_warranty_in(None, Some(now))
        .await
        .unwrap();
    assert_eq!(expired, 0);
}

#[tokio::test]
async fn user_uniqueness_and_toggle() {
    let (_dir, store) = setup().await;

    let req = CreateUserRequest {
        username: "admin".to_string(),
        email: "admin@example.com".to_string(),
        password: "changeme".to_string(),
        role: Some(Role::Admin),
    };
    let user = store.create_user(&req, "hash").await.unwrap();
    assert!(user.is_active);

    let dup = CreateUserRequest {
        username: "admin".to_string(),
        email: "other@example.com".to_string(),
        password: "x".to_string(),
        role: None,
    };
    let err = store.create_user(&dup, "hash").await.unwrap_err();
    assert!(err.to_string().contains("UNIQUE constraint"));

    let conflict = store
        .find_user_by_username_or_email("nobody", "admin@example.com")
        .await
        .unwrap();
    assert!(conflict.is_some());

    let toggled = store.toggle_user_active(&user.id).await.unwrap().unwrap();
    assert!(!toggled.is_active);
    assert_eq!(store.count_active_users().await.unwrap(), 0);

    // ensure_user is idempotent on username
    let again = store
        .ensure_user("admin", "admin@example.com", "hash2", Role::Admin)
        .await
        .unwrap();
    assert_eq!(again.id, user.id);
}
