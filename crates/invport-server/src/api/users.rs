use crate::api::{error_response, store_error, success_message, success_response, success_with_message, validation_error};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use invport_common::types::{CreateUserRequest, UpdateUserRequest, User};
use invport_storage::auth::hash_password;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

#[derive(Serialize, ToSchema)]
pub struct UserData {
    pub user: User,
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.to_string().contains("UNIQUE constraint")
}

/// All accounts, password hashes omitted.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 403, description = "Admin privileges required", body = crate::api::ErrorBody)
    )
)]
async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list_users().await {
        Ok(users) => success_response(StatusCode::OK, serde_json::json!({ "users": users })),
        Err(e) => store_error(&state, "Server error retrieving users", e),
    }
}

/// Create an account. Role defaults to ojt.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserData),
        (status = 400, description = "Validation error or duplicate username/email", body = crate::api::ErrorBody),
        (status = 403, description = "Admin privileges required", body = crate::api::ErrorBody)
    )
)]
async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    let mut errors = Vec::new();
    if req.username.trim().is_empty() {
        errors.push("Username is required".to_string());
    }
    if req.email.trim().is_empty() {
        errors.push("Email is required".to_string());
    }
    if req.password.is_empty() {
        errors.push("Password is required".to_string());
    }
    if !errors.is_empty() {
        return validation_error("Validation error", errors);
    }

    match state
        .store
        .find_user_by_username_or_email(&req.username, &req.email)
        .await
    {
        Ok(Some(_)) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "User with this email or username already exists",
            );
        }
        Ok(None) => {}
        Err(e) => return store_error(&state, "Server error creating user", e),
    }

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => return store_error(&state, "Server error creating user", e),
    };

    match state.store.create_user(&req, &password_hash).await {
        Ok(user) => success_with_message(
            StatusCode::CREATED,
            "User created successfully",
            UserData { user },
        ),
        Err(e) if is_unique_violation(&e) => error_response(
            StatusCode::BAD_REQUEST,
            "User with this email or username already exists",
        ),
        Err(e) => store_error(&state, "Server error creating user", e),
    }
}

/// Update an account. The password cannot be changed through this route.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserData),
        (status = 404, description = "User not found", body = crate::api::ErrorBody)
    )
)]
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    match state.store.update_user(&id, &req).await {
        Ok(Some(user)) => success_with_message(
            StatusCode::OK,
            "User updated successfully",
            UserData { user },
        ),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "User not found"),
        Err(e) if is_unique_violation(&e) => error_response(
            StatusCode::BAD_REQUEST,
            "User with this email or username already exists",
        ),
        Err(e) => store_error(&state, "Server error updating user", e),
    }
}

/// Delete an account.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found", body = crate::api::ErrorBody)
    )
)]
async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.store.delete_user(&id).await {
        Ok(true) => success_message(StatusCode::OK, "User deleted successfully"),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => store_error(&state, "Server error deleting user", e),
    }
}

/// Flip an account's active flag. Deactivated accounts cannot authenticate.
#[utoipa::path(
    put,
    path = "/api/users/{id}/toggle-status",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User status toggled", body = UserData),
        (status = 404, description = "User not found", body = crate::api::ErrorBody)
    )
)]
async fn toggle_user_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.toggle_user_active(&id).await {
        Ok(Some(user)) => success_with_message(
            StatusCode::OK,
            "User status toggled successfully",
            UserData { user },
        ),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => store_error(&state, "Server error toggling user status", e),
    }
}

pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users))
        .routes(routes!(create_user))
        .routes(routes!(update_user))
        .routes(routes!(delete_user))
        .routes(routes!(toggle_user_status))
}
