use crate::config::HttpConfig;
use crate::handlers::{
    auth::{login, signup},
    health::health_check,
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Self-service accounts
        .route("/accounts/signup", post(signup))
        .route("/accounts/login", post(login))
        // Account administration (staff only)
        .route("/api/v1/admin/users", get(get_users).post(create_user))
        .route(
            "/api/v1/admin/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(http.request_timeout))
                .layer(http.cors_layer()),
        )
        .with_state(state)
}
