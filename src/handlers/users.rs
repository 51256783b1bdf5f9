use crate::error::ApiError;
use crate::extractors::StaffUser;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use accounts::admin::{self, AccountChanges, NewAccount};
use accounts::validation::parse_role;
use accounts::{AccountsError, FieldErrors};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::user;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Account as exposed over the API. The password hash is never included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    /// `cliente`, `transportista` or `admin`
    pub tipo: String,
    /// Human readable account type
    pub tipo_display: String,
    pub direccion: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            date_joined: model.date_joined,
            last_login: model.last_login,
            tipo: model.role.as_str().to_string(),
            tipo_display: model.role.label().to_string(),
            direccion: model.address,
        }
    }
}

/// One page of accounts
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Query parameters for listing accounts
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ListUsersQuery {
    /// Only accounts of this type
    pub tipo: Option<String>,
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub per_page: Option<u64>,
}

/// List accounts, optionally filtered by type
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "admin",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<UserListResponse>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Staff account required", body = ErrorResponse)
    )
)]
#[instrument(skip(staff, state), fields(staff = %staff.0))]
pub async fn get_users(
    staff: StaffUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<ListUsersQuery>>,
) -> Result<Json<ApiResponse<UserListResponse>>, ApiError> {
    trace!("Entering get_users function");

    let role = match query.tipo.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(parse_role(value, true).map_err(|message| {
            let mut errors = FieldErrors::new();
            errors.add("tipo", message);
            AccountsError::Validation(errors)
        })?),
    };
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(50);
    debug!("Listing accounts: role={:?}, page={}, per_page={}", role, page, per_page);

    let result = admin::list_accounts(&state.db, role, page, per_page).await?;

    info!("Retrieved {} of {} accounts", result.accounts.len(), result.total);
    Ok(Json(ApiResponse {
        data: UserListResponse {
            users: result.accounts.into_iter().map(UserResponse::from).collect(),
            total: result.total,
            page: result.page,
            per_page: result.per_page,
        },
        message: "Users retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a specific account by ID
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{user_id}",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Staff account required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(staff, state), fields(staff = %staff.0))]
pub async fn get_user(
    staff: StaffUser,
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering get_user function for user_id: {}", user_id);

    let account = admin::get_account(&state.db, user_id).await?;

    Ok(Json(ApiResponse {
        data: UserResponse::from(account),
        message: "User retrieved successfully".to_string(),
        success: true,
    }))
}

/// Create an account with any type and flags
#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    tag = "admin",
    request_body = NewAccount,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Submission rejected, messages keyed by field", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Staff account required", body = ErrorResponse)
    )
)]
#[instrument(skip(staff, state, input), fields(staff = %staff.0, username = %input.username))]
pub async fn create_user(
    staff: StaffUser,
    State(state): State<AppState>,
    Json(input): Json<NewAccount>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    trace!("Entering create_user function");

    let account = admin::create_account(&state.db, input).await?;

    info!("Staff {} created account {} (id {})", staff.0, account, account.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: UserResponse::from(account),
            message: "User created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Edit an account; omitted fields are left unchanged
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{user_id}",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = AccountChanges,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Submission rejected, messages keyed by field", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Staff account required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(staff, state, changes), fields(staff = %staff.0))]
pub async fn update_user(
    staff: StaffUser,
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(changes): Json<AccountChanges>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering update_user function for user_id: {}", user_id);

    let account = admin::update_account(&state.db, user_id, changes).await?;

    info!("Staff {} updated account {} (id {})", staff.0, account, account.id);
    Ok(Json(ApiResponse {
        data: UserResponse::from(account),
        message: "User updated successfully".to_string(),
        success: true,
    }))
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{user_id}",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Staff account required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(staff, state), fields(staff = %staff.0))]
pub async fn delete_user(
    staff: StaffUser,
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_user function for user_id: {}", user_id);

    admin::delete_account(&state.db, user_id).await?;

    info!("Staff {} deleted account id {}", staff.0, user_id);
    Ok(Json(ApiResponse {
        data: format!("User {} deleted", user_id),
        message: "User deleted successfully".to_string(),
        success: true,
    }))
}
