use crate::{auth, handlers, AppState};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the full application router. Kept out of `main` so the
/// integration tests can drive the real routes with `tower::oneshot`.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::me_handler))
        .route(
            "/auth/change-password",
            post(handlers::change_password_handler),
        )
        .route("/admin/users", get(handlers::list_users_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/auth/register", post(handlers::register_handler))
        .route("/auth/login", post(handlers::login_handler))
        .route(
            "/auth/forgot-password",
            post(handlers::forgot_password_handler),
        )
        .route(
            "/auth/reset-password",
            post(handlers::reset_password_handler),
        )
        .merge(protected_routes)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
