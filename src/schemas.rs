use crate::handlers::auth::LoginRequest;
use crate::handlers::users::{ListUsersQuery, UserListResponse, UserResponse};
use accounts::SignupForm;
use accounts::admin::{AccountChanges, NewAccount};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
    /// Field-level messages for rejected submissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::signup,
        crate::handlers::auth::login,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::create_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
    ),
    components(
        schemas(
            ApiResponse<UserResponse>,
            ApiResponse<UserListResponse>,
            ApiResponse<String>,
            ErrorResponse,
            HealthResponse,
            SignupForm,
            LoginRequest,
            NewAccount,
            AccountChanges,
            ListUsersQuery,
            UserResponse,
            UserListResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Self-service signup and login"),
        (name = "admin", description = "Account administration, staff HTTP Basic credentials required"),
    ),
    info(
        title = "Devoluciones API",
        description = "Returns and logistics platform - account management",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
