pub mod dashboard;
pub mod inventory;
pub mod pagination;
pub mod reports;
pub mod staff;
pub mod users;

use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Success envelope: `{success: true, message?, data?}`.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Error envelope: `{success: false, message, error?, errors?}`.
///
/// `error` carries the underlying failure detail (server errors only, and
/// only when the deployment exposes it); `errors` carries field-level
/// validation messages.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

pub fn success_response<T>(status: StatusCode, data: T) -> Response
where
    T: Serialize,
{
    (
        status,
        Json(ApiResponse {
            success: true,
            message: None,
            data: Some(data),
        }),
    )
        .into_response()
}

pub fn success_with_message<T>(status: StatusCode, message: &str, data: T) -> Response
where
    T: Serialize,
{
    (
        status,
        Json(ApiResponse {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
        }),
    )
        .into_response()
}

pub fn success_message(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiResponse::<Value> {
            success: true,
            message: Some(message.to_string()),
            data: None,
        }),
    )
        .into_response()
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            success: false,
            message: message.to_string(),
            error: None,
            errors: None,
        }),
    )
        .into_response()
}

pub fn validation_error(message: &str, errors: Vec<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            success: false,
            message: message.to_string(),
            error: None,
            errors: Some(errors),
        }),
    )
        .into_response()
}

/// Map a storage failure onto a generic server-error envelope. The
/// underlying message is attached only when the deployment exposes error
/// detail.
pub fn store_error(state: &AppState, message: &str, err: anyhow::Error) -> Response {
    tracing::error!(error = %err, "{message}");
    let detail = state
        .config
        .expose_error_detail
        .then(|| err.to_string());
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            success: false,
            message: message.to_string(),
            error: detail,
            errors: None,
        }),
    )
        .into_response()
}

/// Health check payload.
#[derive(Serialize, ToSchema)]
struct HealthResponse {
    message: String,
    version: String,
    timestamp: chrono::DateTime<Utc>,
    uptime_secs: i64,
}

/// Service liveness.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = (Utc::now() - state.start_time).num_seconds();
    success_response(
        StatusCode::OK,
        HealthResponse {
            message: "IT Inventory Portal API is running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            uptime_secs: uptime,
        },
    )
}

/// API index: the endpoint groups this service exposes.
#[utoipa::path(
    get,
    path = "/api",
    tag = "Health",
    responses(
        (status = 200, description = "API index")
    )
)]
async fn api_index() -> impl IntoResponse {
    success_with_message(
        StatusCode::OK,
        "Welcome to the IT Inventory Portal API",
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/api/auth",
                "inventory": "/api/inventory",
                "dashboard": "/api/dashboard",
                "reports": "/api/reports",
                "users": "/api/users",
                "ojt": "/api/ojt",
                "health": "/api/health",
            },
        }),
    )
}

/// Fallback for unknown `/api/*` paths.
pub async fn not_found(uri: axum::http::Uri) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        &format!("API endpoint not found: {}", uri.path()),
    )
}

pub fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health))
        .routes(routes!(api_index))
}

pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(crate::auth::login))
}

/// Routes available to every authenticated active account.
pub fn protected_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(crate::auth::me))
        .routes(routes!(inventory::list_items))
        .routes(routes!(inventory::get_item))
        .routes(routes!(inventory::inventory_stats_summary))
        .routes(routes!(inventory::inventory_recent_activity))
        .merge(dashboard::dashboard_routes())
        .merge(reports::report_routes())
}

/// Admin-gated routes.
pub fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(inventory::create_item))
        .routes(routes!(inventory::update_item))
        .routes(routes!(inventory::delete_item))
        .merge(users::user_routes())
}

/// OJT submission routes (admins may also use them).
pub fn ojt_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(staff::ojt_create_item))
        .routes(routes!(staff::ojt_profile))
}
