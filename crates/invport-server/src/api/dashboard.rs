use crate::api::pagination::deserialize_optional_u64;
use crate::api::{store_error, success_response};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Duration, Utc};
use invport_common::types::ItemStatus;
use invport_report::alerts::{maintenance_alerts, merge_alerts, warranty_alerts, Alert};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_items: u64,
    pub active_users: u64,
    /// Items created in the last 7 days.
    pub recently_added: u64,
    /// Warranties expiring in the next 30 days.
    pub expiring_warranties: u64,
}

#[derive(Serialize, ToSchema)]
pub struct BuildingStat {
    pub building: String,
    pub count: i64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub overview: DashboardOverview,
    /// Zero-filled over the full fixed status set.
    pub status_stats: std::collections::HashMap<String, i64>,
    /// Buildings ranked by item count, descending.
    pub items_by_building: Vec<BuildingStat>,
}

/// Dashboard statistics. The aggregate sub-queries run concurrently and are
/// awaited together.
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
async fn dashboard_stats(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let (total_items, active_users, recently_added, expiring_warranties, status_rows, buildings) =
        match tokio::try_join!(
            state.store.count_all_items(),
            state.store.count_active_users(),
            state.store.count_items_created_since(now - Duration::days(7)),
            state
                .store
                .count_items_with_warranty_in(Some(now), Some(now + Duration::days(30))),
            state.store.count_items_by_status(),
            state.store.count_items_by_building(),
        ) {
            Ok(v) => v,
            Err(e) => {
                return store_error(&state, "Server error retrieving dashboard statistics", e)
            }
        };

    let rows: Vec<(String, i64)> = status_rows.into_iter().map(|r| (r.status, r.count)).collect();
    success_response(
        StatusCode::OK,
        DashboardStats {
            overview: DashboardOverview {
                total_items,
                active_users,
                recently_added,
                expiring_warranties,
            },
            status_stats: invport_report::status_breakdown(&rows),
            items_by_building: buildings
                .into_iter()
                .map(|b| BuildingStat {
                    building: b.building,
                    count: b.count,
                })
                .collect(),
        },
    )
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct ActivityQuery {
    /// Number of entries (default 5)
    #[param(required = false)]
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    limit: Option<u64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ActivityItem {
    name: String,
    model: Option<String>,
    location: String,
    status: ItemStatus,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ActivityEntry {
    id: String,
    /// `created` when the item has never been touched since creation,
    /// `updated` otherwise.
    #[serde(rename = "type")]
    kind: String,
    action: String,
    item: ActivityItem,
    timestamp: DateTime<Utc>,
}

/// Recent inventory activity, newest first.
#[utoipa::path(
    get,
    path = "/api/dashboard/recent-activity",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    params(ActivityQuery),
    responses(
        (status = 200, description = "Recent activity entries", body = Vec<ActivityEntry>),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
async fn dashboard_recent_activity(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(5).clamp(1, 100);
    let items = match state.store.recently_updated_items(limit).await {
        Ok(items) => items,
        Err(e) => return store_error(&state, "Server error retrieving recent activity", e),
    };

    let activities: Vec<ActivityEntry> = items
        .into_iter()
        .map(|item| {
            let is_new = item.created_at == item.updated_at;
            ActivityEntry {
                id: item.id.clone(),
                kind: if is_new { "created" } else { "updated" }.to_string(),
                action: if is_new { "Added new item" } else { "Updated item" }.to_string(),
                item: ActivityItem {
                    name: item.display_name().to_string(),
                    model: item.model.clone(),
                    location: item.location(),
                    status: item.status,
                },
                timestamp: item.updated_at,
            }
        })
        .collect();

    success_response(StatusCode::OK, serde_json::json!({ "activities": activities }))
}

/// System alerts: warranties expiring within 30 days and items sitting in
/// maintenance, merged and ordered by severity.
#[utoipa::path(
    get,
    path = "/api/dashboard/alerts",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Alerts feed", body = Vec<Alert>),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
async fn dashboard_alerts(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let (expiring, in_maintenance) = match tokio::try_join!(
        state
            .store
            .items_with_warranty_in(now, now + Duration::days(30)),
        state.store.items_in_maintenance(),
    ) {
        Ok(v) => v,
        Err(e) => return store_error(&state, "Server error retrieving alerts", e),
    };

    let alerts = merge_alerts(
        warranty_alerts(&expiring, now),
        maintenance_alerts(&in_maintenance, now),
    );
    success_response(StatusCode::OK, serde_json::json!({ "alerts": alerts }))
}

pub fn dashboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(dashboard_stats))
        .routes(routes!(dashboard_recent_activity))
        .routes(routes!(dashboard_alerts))
}
