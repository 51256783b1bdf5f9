use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use model::entities::user;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::schemas::AppState;

/// An authenticated, active staff account taken from HTTP Basic credentials.
#[derive(Debug, Clone)]
pub struct StaffUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (username, password) = basic_credentials(parts).ok_or(ApiError::Unauthorized)?;

        let account = accounts::auth::authenticate(&state.db, &username, &password).await?;
        if !account.is_staff {
            warn!("Non-staff account '{}' tried to reach the admin surface", account);
            return Err(ApiError::Forbidden);
        }

        debug!("Staff account '{}' authenticated", account);
        Ok(StaffUser(account))
    }
}

/// Decode `Authorization: Basic base64(username:password)`.
fn basic_credentials(parts: &Parts) -> Option<(String, String)> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
