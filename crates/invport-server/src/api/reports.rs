use crate::api::{store_error, success_response};
use crate::state::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use chrono::{Datelike, Duration, Months, TimeZone, Utc};
use invport_report::buckets::{age_distribution, warranty_buckets, AgeDistribution, WarrantyBuckets};
use invport_report::cost::{category_analytics, cost_analysis, CategoryAnalytics, CostAnalysis};
use invport_report::monthly::{monthly_histogram, MonthCount};
use invport_report::pdf::{export_pdf, PdfReport};
use invport_storage::ItemFilter;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub total_items: u64,
    /// Zero-filled over the full fixed status set.
    pub items_by_status: HashMap<String, i64>,
    /// Keyed by building name.
    pub items_by_building: HashMap<String, i64>,
    /// Keyed `"<building> - Floor <floor>"`.
    pub items_by_floor: HashMap<String, i64>,
    /// Warranties expiring in the next 30 days.
    pub expiring_warranties: u64,
    /// Trailing-12-month creation histogram, chronological.
    pub items_by_month: Vec<MonthCount>,
}

/// Comprehensive report data. All sub-queries run concurrently and are
/// awaited together: any one failing fails the whole response.
#[utoipa::path(
    get,
    path = "/api/reports/data",
    tag = "Reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Report data", body = ReportData),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
async fn report_data(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let (total_items, status_rows, building_rows, floor_rows, expiring_warranties, created_at) =
        match tokio::try_join!(
            state.store.count_all_items(),
            state.store.count_items_by_status(),
            state.store.count_items_by_building(),
            state.store.count_items_by_floor(),
            state
                .store
                .count_items_with_warranty_in(Some(now), Some(now + Duration::days(30))),
            state.store.created_at_values_since(now - Months::new(12)),
        ) {
            Ok(v) => v,
            Err(e) => return store_error(&state, "Server error retrieving reports data", e),
        };

    let status_rows: Vec<(String, i64)> =
        status_rows.into_iter().map(|r| (r.status, r.count)).collect();
    let building_rows: Vec<(String, i64)> = building_rows
        .into_iter()
        .map(|r| (r.building, r.count))
        .collect();
    let floor_rows: Vec<(String, String, i64)> = floor_rows
        .into_iter()
        .map(|r| (r.building, r.floor, r.count))
        .collect();

    success_response(
        StatusCode::OK,
        ReportData {
            total_items,
            items_by_status: invport_report::status_breakdown(&status_rows),
            items_by_building: invport_report::building_breakdown(&building_rows),
            items_by_floor: invport_report::floor_breakdown(&floor_rows),
            expiring_warranties,
            items_by_month: monthly_histogram(&created_at, now),
        },
    )
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopBuilding {
    pub name: String,
    pub count: i64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_items: u64,
    pub available_items: u64,
    pub in_use_items: u64,
    pub maintenance_items: u64,
    /// Items created since the start of the current calendar month.
    pub added_this_month: u64,
    /// Items updated in the last 7 days.
    pub updated_this_week: u64,
    pub expiring_in_30_days: u64,
    pub expiring_in_7_days: u64,
    pub top_building: TopBuilding,
}

fn status_filter(status: &str) -> ItemFilter {
    ItemFilter {
        status: Some(status.to_string()),
        ..Default::default()
    }
}

/// Summary statistics for the reports page.
#[utoipa::path(
    get,
    path = "/api/reports/summary",
    tag = "Reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Report summary", body = ReportSummary),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
async fn report_summary(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let start_of_month = now
        .date_naive()
        .with_day(1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(now);

    let available_filter = status_filter("Available");
    let in_use_filter = status_filter("In Use");
    let maintenance_filter = status_filter("Maintenance");

    let (
        total_items,
        available_items,
        in_use_items,
        maintenance_items,
        added_this_month,
        updated_this_week,
        expiring_in_30_days,
        expiring_in_7_days,
        buildings,
    ) = match tokio::try_join!(
        state.store.count_all_items(),
        state.store.count_items(&available_filter),
        state.store.count_items(&in_use_filter),
        state.store.count_items(&maintenance_filter),
        state.store.count_items_created_since(start_of_month),
        state.store.count_items_updated_since(now - Duration::days(7)),
        state
            .store
            .count_items_with_warranty_in(Some(now), Some(now + Duration::days(30))),
        state
            .store
            .count_items_with_warranty_in(Some(now), Some(now + Duration::days(7))),
        state.store.count_items_by_building(),
    ) {
        Ok(v) => v,
        Err(e) => return store_error(&state, "Server error retrieving reports summary", e),
    };

    let top_building = buildings
        .first()
        .map(|b| TopBuilding {
            name: b.building.clone(),
            count: b.count,
        })
        .unwrap_or(TopBuilding {
            name: "N/A".to_string(),
            count: 0,
        });

    success_response(
        StatusCode::OK,
        ReportSummary {
            total_items,
            available_items,
            in_use_items,
            maintenance_items,
            added_this_month,
            updated_this_week,
            expiring_in_30_days,
            expiring_in_7_days,
            top_building,
        },
    )
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportAnalytics {
    pub category_analytics: Vec<CategoryAnalytics>,
    pub warranty_analytics: WarrantyBuckets,
    pub age_distribution: AgeDistribution,
    pub cost_analysis: CostAnalysis,
}

/// Detailed analytics: category breakdown, warranty buckets, asset age
/// distribution and cost aggregates.
#[utoipa::path(
    get,
    path = "/api/reports/analytics",
    tag = "Reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Report analytics", body = ReportAnalytics),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
async fn report_analytics(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let (category_rows, expiries, purchases, costs) = match tokio::try_join!(
        state.store.category_cost_rows(),
        state.store.warranty_expiry_values(),
        state.store.purchase_date_values(),
        state.store.cost_values(),
    ) {
        Ok(v) => v,
        Err(e) => return store_error(&state, "Server error retrieving analytics", e),
    };

    let category_rows: Vec<(Option<String>, Option<String>)> = category_rows
        .into_iter()
        .map(|r| (r.category, r.cost))
        .collect();

    success_response(
        StatusCode::OK,
        ReportAnalytics {
            category_analytics: category_analytics(&category_rows),
            warranty_analytics: warranty_buckets(&expiries, now),
            age_distribution: age_distribution(&purchases, now),
            cost_analysis: cost_analysis(&costs),
        },
    )
}

/// Export all items as CSV: one row per item, fixed column order, every
/// field double-quoted.
#[utoipa::path(
    get,
    path = "/api/reports/export/csv",
    tag = "Reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv"),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
async fn export_report_csv(State(state): State<AppState>) -> impl IntoResponse {
    let items = match state.store.all_items_newest_first().await {
        Ok(items) => items,
        Err(e) => return store_error(&state, "Server error exporting CSV", e),
    };

    match invport_report::csv::export_csv(&items) {
        Ok(csv_text) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"inventory_report.csv\"",
                ),
            ],
            csv_text,
        )
            .into_response(),
        Err(e) => store_error(&state, "Server error exporting CSV", e.into()),
    }
}

/// Export the aggregate report as a PDF document.
#[utoipa::path(
    get,
    path = "/api/reports/export/pdf",
    tag = "Reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF attachment", content_type = "application/pdf"),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
async fn export_report_pdf(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let (total_items, status_rows, building_rows, recent_items) = match tokio::try_join!(
        state.store.count_all_items(),
        state.store.count_items_by_status(),
        state.store.count_items_by_building(),
        state.store.recently_created_items(10),
    ) {
        Ok(v) => v,
        Err(e) => return store_error(&state, "Server error exporting PDF", e),
    };

    let report = PdfReport {
        total_items,
        generated_at: now,
        status_breakdown: status_rows.into_iter().map(|r| (r.status, r.count)).collect(),
        building_breakdown: building_rows
            .into_iter()
            .map(|r| (r.building, r.count))
            .collect(),
        recent_items,
    };

    match export_pdf(&report) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"inventory_report.pdf\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => store_error(&state, "Server error exporting PDF", e.into()),
    }
}

pub fn report_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(report_data))
        .routes(routes!(report_summary))
        .routes(routes!(report_analytics))
        .routes(routes!(export_report_csv))
        .routes(routes!(export_report_pdf))
}
