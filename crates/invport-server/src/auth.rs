use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::Json;
use invport_common::types::{LoginRequest, LoginResponse, Role, User};
use invport_storage::auth::verify_password;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::api::{error_response, success_response};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub iat: u64,
    pub exp: u64,
}

/// The verified account attached to a request by the JWT middleware.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

pub fn create_token(
    secret: &str,
    user: &User,
    expire_secs: u64,
) -> anyhow::Result<String> {
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        role: user.role,
        iat: now,
        exp: now + expire_secs,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn validate_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// JWT auth middleware: validates the bearer token, re-loads the account and
/// rejects missing or deactivated ones, then attaches [`AuthUser`] for the
/// handlers and role guards downstream.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> axum::response::Response {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        None => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "No token provided, authorization denied",
            );
        }
        Some(header) => {
            if let Some(token) = header.strip_prefix("Bearer ") {
                if token.is_empty() {
                    return error_response(StatusCode::UNAUTHORIZED, "Invalid token format");
                }
                token
            } else {
                return error_response(StatusCode::UNAUTHORIZED, "Invalid token format");
            }
        }
    };

    let claims = match validate_token(&state.jwt_secret, token) {
        Ok(claims) => claims,
        Err(e) => {
            let msg = if matches!(
                e.kind(),
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
            ) {
                "Token has expired"
            } else {
                "Invalid token"
            };
            return error_response(StatusCode::UNAUTHORIZED, msg);
        }
    };

    let user = match state.store.get_user_by_id(&claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "Token is not valid - user not found",
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load user for auth");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error in authentication");
        }
    };

    if !user.is_active {
        return error_response(StatusCode::UNAUTHORIZED, "User account is deactivated");
    }

    req.extensions_mut().insert(AuthUser(user));
    next.run(req).await
}

/// Guard for admin-only routes; must run after [`jwt_auth_middleware`].
pub async fn require_admin(req: Request<Body>, next: Next) -> axum::response::Response {
    match req.extensions().get::<AuthUser>() {
        Some(AuthUser(user)) if user.role == Role::Admin => next.run(req).await,
        Some(_) => error_response(
            StatusCode::FORBIDDEN,
            "Access denied. Admin privileges required.",
        ),
        None => error_response(
            StatusCode::UNAUTHORIZED,
            "No token provided, authorization denied",
        ),
    }
}

/// Guard for OJT submission routes; admins pass as well.
pub async fn require_ojt(req: Request<Body>, next: Next) -> axum::response::Response {
    match req.extensions().get::<AuthUser>() {
        Some(AuthUser(user)) if matches!(user.role, Role::Ojt | Role::Admin) => {
            next.run(req).await
        }
        Some(_) => error_response(
            StatusCode::FORBIDDEN,
            "Access denied. OJT or Admin privileges required.",
        ),
        None => error_response(
            StatusCode::UNAUTHORIZED,
            "No token provided, authorization denied",
        ),
    }
}

/// Verify credentials and issue a token. Deactivated accounts are rejected
/// even with a valid password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = crate::api::ErrorBody),
        (status = 401, description = "Invalid credentials or deactivated account", body = crate::api::ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if req.username.is_empty() || req.password.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Username and password are required");
    }

    let user = match state.store.get_user_by_username(&req.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to query user for login");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error during login");
        }
    };

    if !user.is_active {
        return error_response(StatusCode::UNAUTHORIZED, "User account is deactivated");
    }

    match verify_password(&req.password, &user.password_hash) {
        Ok(true) => {}
        _ => {
            return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
        }
    }

    match create_token(&state.jwt_secret, &user, state.token_expire_secs) {
        Ok(token) => success_response(
            StatusCode::OK,
            LoginResponse {
                token,
                expires_in: state.token_expire_secs,
                user,
            },
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create token");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error during login")
        }
    }
}

/// The authenticated account.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated", body = crate::api::ErrorBody)
    )
)]
pub async fn me(axum::Extension(AuthUser(user)): axum::Extension<AuthUser>) -> impl IntoResponse {
    success_response(StatusCode::OK, serde_json::json!({ "user": user }))
}
