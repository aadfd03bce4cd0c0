use crate::state::AppState;
use crate::{api, auth, logging};
use axum::http::HeaderValue;
use axum::middleware;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "invport API",
        description = "IT asset inventory portal REST API",
    ),
    tags(
        (name = "Health", description = "Service health and API index"),
        (name = "Auth", description = "Authentication"),
        (name = "Inventory", description = "Inventory item CRUD and queries"),
        (name = "Dashboard", description = "Dashboard statistics and alerts"),
        (name = "Reports", description = "Aggregated reports and exports"),
        (name = "Users", description = "Account administration"),
        (name = "OJT", description = "On-the-job-trainee submissions")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

fn cors_layer(state: &AppState) -> CorsLayer {
    if state.config.cors_allowed_origins.is_empty() {
        // Development mode: any origin.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

pub fn build_http_app(state: AppState) -> Router {
    let (public_router, public_spec) = api::public_routes().split_for_parts();
    let (login_router, login_spec) = api::auth_routes().split_for_parts();
    let (protected_router, protected_spec) = api::protected_routes().split_for_parts();
    let (admin_router, admin_spec) = api::admin_routes().split_for_parts();
    let (ojt_router, ojt_spec) = api::ojt_routes().split_for_parts();

    let mut merged_spec = ApiDoc::openapi();
    merged_spec.merge(public_spec);
    merged_spec.merge(login_spec);
    merged_spec.merge(protected_spec);
    merged_spec.merge(admin_spec);
    merged_spec.merge(ojt_spec);

    let cors = cors_layer(&state);

    // Role guards wrap their route groups before JWT auth wraps everything
    // protected, so the guard always sees the verified AuthUser extension.
    let admin_router = admin_router.layer(middleware::from_fn(auth::require_admin));
    let ojt_router = ojt_router.layer(middleware::from_fn(auth::require_ojt));

    public_router
        .merge(login_router)
        .merge(
            protected_router
                .merge(admin_router)
                .merge(ojt_router)
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::jwt_auth_middleware,
                )),
        )
        .fallback(api::not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api/openapi.json", merged_spec))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logging))
}
