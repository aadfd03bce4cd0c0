use crate::api::pagination::{deserialize_optional_u64, PageInfo, PageParams};
use crate::api::{
    error_response, store_error, success_message, success_response, success_with_message,
    validation_error,
};
use crate::auth::AuthUser;
use crate::state::AppState;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use invport_common::types::{CreateItemRequest, InventoryItemRecord, UpdateItemRequest};
use invport_storage::{ItemFilter, Order, SortField};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Wire shape of an inventory item: the stored record plus the derived
/// location string.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[serde(flatten)]
    pub item: InventoryItemRecord,
    pub location: String,
}

impl From<InventoryItemRecord> for ItemPayload {
    fn from(item: InventoryItemRecord) -> Self {
        let location = item.location();
        Self { item, location }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ItemListData {
    pub items: Vec<ItemPayload>,
    pub pagination: PageInfo,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListItemsQuery {
    /// 1-based page number (default 1)
    #[param(required = false)]
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    page: Option<u64>,
    /// Items per page (default 10)
    #[param(required = false)]
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    limit: Option<u64>,
    /// Case-insensitive substring, OR'd across name, model, building, room
    /// and serial number
    #[param(required = false)]
    #[serde(default)]
    search: Option<String>,
    /// Exact building filter
    #[param(required = false)]
    #[serde(default)]
    building: Option<String>,
    /// Exact status filter; unrecognized values match nothing
    #[param(required = false)]
    #[serde(default)]
    status: Option<String>,
    /// Sort field (default createdAt); unknown fields are rejected
    #[param(required = false)]
    #[serde(default, rename = "sortBy")]
    sort_by: Option<String>,
    /// `asc` or `desc` (default desc)
    #[param(required = false)]
    #[serde(default, rename = "sortOrder")]
    sort_order: Option<String>,
}

fn is_valid_id(id: &str) -> bool {
    id.parse::<i64>().is_ok()
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.to_string().contains("UNIQUE constraint")
}

/// Paginated inventory listing with search, filters and sorting.
#[utoipa::path(
    get,
    path = "/api/inventory",
    tag = "Inventory",
    security(("bearer_auth" = [])),
    params(ListItemsQuery),
    responses(
        (status = 200, description = "Page of inventory items", body = ItemListData),
        (status = 400, description = "Invalid sort field", body = crate::api::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> impl IntoResponse {
    let pagination = PageParams {
        page: query.page,
        limit: query.limit,
    };
    let page = pagination.page();
    let limit = pagination.limit();

    let sort_param = query.sort_by.as_deref().unwrap_or("createdAt");
    let Some(sort_by) = SortField::from_param(sort_param) else {
        return validation_error(
            "Validation error",
            vec![format!("Unknown sortBy field: {sort_param}")],
        );
    };
    let order = match query.sort_order.as_deref() {
        Some("asc") => Order::Asc,
        _ => Order::Desc,
    };

    let filter = ItemFilter {
        search: query.search,
        building: query.building,
        status: query.status,
    };

    let (items, total) = match tokio::try_join!(
        state
            .store
            .list_items(&filter, sort_by, order, limit, pagination.offset()),
        state.store.count_items(&filter),
    ) {
        Ok(v) => v,
        Err(e) => return store_error(&state, "Server error retrieving inventory items", e),
    };

    success_response(
        StatusCode::OK,
        ItemListData {
            items: items.into_iter().map(ItemPayload::from).collect(),
            pagination: PageInfo::compute(page, limit, total),
        },
    )
}

#[derive(Serialize, ToSchema)]
pub struct ItemData {
    pub item: ItemPayload,
}

/// Single inventory item by ID.
#[utoipa::path(
    get,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Inventory item", body = ItemData),
        (status = 400, description = "Malformed ID", body = crate::api::ErrorBody),
        (status = 404, description = "Item not found", body = crate::api::ErrorBody)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !is_valid_id(&id) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid inventory item ID format");
    }
    match state.store.get_item(&id).await {
        Ok(Some(item)) => success_response(
            StatusCode::OK,
            ItemData {
                item: ItemPayload::from(item),
            },
        ),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Inventory item not found"),
        Err(e) => store_error(&state, "Server error retrieving inventory item", e),
    }
}

fn required_field_errors(req: &CreateItemRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if req.building.trim().is_empty() {
        errors.push("Building is required".to_string());
    }
    if req.floor.trim().is_empty() {
        errors.push("Floor is required".to_string());
    }
    if req.room.trim().is_empty() {
        errors.push("Room name or number is required".to_string());
    }
    errors
}

pub(crate) async fn create_item_inner(
    state: &AppState,
    req: &CreateItemRequest,
    submitted_by: &str,
) -> axum::response::Response {
    let errors = required_field_errors(req);
    if !errors.is_empty() {
        return validation_error("Validation error", errors);
    }

    match state.store.insert_item(req, submitted_by).await {
        Ok(item) => success_with_message(
            StatusCode::CREATED,
            "Inventory item created successfully",
            ItemData {
                item: ItemPayload::from(item),
            },
        ),
        Err(e) if is_unique_violation(&e) => {
            error_response(StatusCode::BAD_REQUEST, "Serial number already exists")
        }
        Err(e) => store_error(state, "Server error creating inventory item", e),
    }
}

/// Create an inventory item. `submittedBy` is stamped from the
/// authenticated username.
#[utoipa::path(
    post,
    path = "/api/inventory",
    tag = "Inventory",
    security(("bearer_auth" = [])),
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemData),
        (status = 400, description = "Validation error or duplicate serial number", body = crate::api::ErrorBody),
        (status = 403, description = "Admin privileges required", body = crate::api::ErrorBody)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(req): Json<CreateItemRequest>,
) -> impl IntoResponse {
    create_item_inner(&state, &req, &user.username).await
}

/// Partially update an inventory item.
#[utoipa::path(
    put,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Item ID")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemData),
        (status = 400, description = "Malformed ID or duplicate serial number", body = crate::api::ErrorBody),
        (status = 404, description = "Item not found", body = crate::api::ErrorBody)
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateItemRequest>,
) -> impl IntoResponse {
    if !is_valid_id(&id) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid inventory item ID format");
    }
    match state.store.update_item(&id, &req).await {
        Ok(Some(item)) => success_with_message(
            StatusCode::OK,
            "Inventory item updated successfully",
            ItemData {
                item: ItemPayload::from(item),
            },
        ),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Inventory item not found"),
        Err(e) if is_unique_violation(&e) => {
            error_response(StatusCode::BAD_REQUEST, "Serial number already exists")
        }
        Err(e) => store_error(&state, "Server error updating inventory item", e),
    }
}

/// Delete an inventory item.
#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 400, description = "Malformed ID", body = crate::api::ErrorBody),
        (status = 404, description = "Item not found", body = crate::api::ErrorBody)
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !is_valid_id(&id) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid inventory item ID format");
    }
    match state.store.delete_item(&id).await {
        Ok(true) => success_message(StatusCode::OK, "Inventory item deleted successfully"),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Inventory item not found"),
        Err(e) => store_error(&state, "Server error deleting inventory item", e),
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStatsSummary {
    pub total_items: u64,
    /// Zero-filled over the full fixed status set.
    pub status_stats: std::collections::HashMap<String, i64>,
    /// Items created in the last 7 days.
    pub recent_items: u64,
    /// Warranties expiring in the next 30 days.
    pub expiring_warranties: u64,
}

/// Inventory statistics for the dashboard summary card.
#[utoipa::path(
    get,
    path = "/api/inventory/stats/summary",
    tag = "Inventory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inventory statistics", body = InventoryStatsSummary),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
pub async fn inventory_stats_summary(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let (total_items, status_rows, recent_items, expiring_warranties) = match tokio::try_join!(
        state.store.count_all_items(),
        state.store.count_items_by_status(),
        state.store.count_items_created_since(now - Duration::days(7)),
        state
            .store
            .count_items_with_warranty_in(Some(now), Some(now + Duration::days(30))),
    ) {
        Ok(v) => v,
        Err(e) => return store_error(&state, "Server error retrieving inventory statistics", e),
    };

    let rows: Vec<(String, i64)> = status_rows.into_iter().map(|r| (r.status, r.count)).collect();
    success_response(
        StatusCode::OK,
        InventoryStatsSummary {
            total_items,
            status_stats: invport_report::status_breakdown(&rows),
            recent_items,
            expiring_warranties,
        },
    )
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentActivityQuery {
    /// Number of entries (default 10)
    #[param(required = false)]
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    limit: Option<u64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentItemEntry {
    pub id: String,
    pub name: Option<String>,
    pub model: Option<String>,
    pub building: String,
    pub room: String,
    pub status: invport_common::types::ItemStatus,
    pub updated_at: DateTime<Utc>,
}

/// Most recently updated items, trimmed projection.
#[utoipa::path(
    get,
    path = "/api/inventory/recent-activity",
    tag = "Inventory",
    security(("bearer_auth" = [])),
    params(RecentActivityQuery),
    responses(
        (status = 200, description = "Recently updated items", body = Vec<RecentItemEntry>),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
pub async fn inventory_recent_activity(
    State(state): State<AppState>,
    Query(query): Query<RecentActivityQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    match state.store.recently_updated_items(limit).await {
        Ok(items) => {
            let entries: Vec<RecentItemEntry> = items
                .into_iter()
                .map(|item| RecentItemEntry {
                    id: item.id,
                    name: item.name,
                    model: item.model,
                    building: item.building,
                    room: item.room,
                    status: item.status,
                    updated_at: item.updated_at,
                })
                .collect();
            success_response(StatusCode::OK, serde_json::json!({ "recentItems": entries }))
        }
        Err(e) => store_error(&state, "Server error retrieving recent activity", e),
    }
}
