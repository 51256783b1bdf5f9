use crate::error::ApiError;
use crate::handlers::users::UserResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use accounts::SignupForm;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

/// Request body for logging in
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Register a new client or carrier account
#[utoipa::path(
    post,
    path = "/accounts/signup",
    tag = "accounts",
    request_body = SignupForm,
    responses(
        (status = 201, description = "Account created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Submission rejected, messages keyed by field", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupForm>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    trace!("Entering signup function");
    debug!("Signup requested for username '{}' as '{}'", form.username, form.tipo);

    let account = form.save(&state.db).await?;

    info!("Signup completed for account {} (id {})", account, account.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: UserResponse::from(account),
            message: "Account created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Check credentials and record the login time
#[utoipa::path(
    post,
    path = "/accounts/login",
    tag = "accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<UserResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering login function");

    let account = accounts::auth::login(&state.db, &request.username, &request.password).await?;

    Ok(Json(ApiResponse {
        data: UserResponse::from(account),
        message: "Login successful".to_string(),
        success: true,
    }))
}
