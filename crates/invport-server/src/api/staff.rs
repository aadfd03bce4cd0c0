use crate::api::inventory::create_item_inner;
use crate::api::success_response;
use crate::auth::AuthUser;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use invport_common::types::{CreateItemRequest, User};

/// Submit an inventory item as an OJT. Identical to the admin create path;
/// `submittedBy` is stamped from the authenticated trainee.
#[utoipa::path(
    post,
    path = "/api/ojt/inventory",
    tag = "OJT",
    security(("bearer_auth" = [])),
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = crate::api::inventory::ItemData),
        (status = 400, description = "Validation error or duplicate serial number", body = crate::api::ErrorBody),
        (status = 403, description = "OJT or admin privileges required", body = crate::api::ErrorBody)
    )
)]
pub async fn ojt_create_item(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(req): Json<CreateItemRequest>,
) -> impl IntoResponse {
    create_item_inner(&state, &req, &user.username).await
}

/// The authenticated OJT's profile.
#[utoipa::path(
    get,
    path = "/api/ojt/profile",
    tag = "OJT",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "OJT profile", body = User),
        (status = 403, description = "OJT or admin privileges required", body = crate::api::ErrorBody)
    )
)]
pub async fn ojt_profile(
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> impl IntoResponse {
    success_response(StatusCode::OK, serde_json::json!({ "user": user }))
}
