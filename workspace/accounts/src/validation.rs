use std::borrow::Cow;

use model::entities::user::{self, Role};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::trace;
use validator::ValidationError;

pub const USERNAME_MAX_LENGTH: usize = 150;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_INVALID_USERNAME: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const MSG_INVALID_EMAIL: &str = "Enter a valid email address.";
pub const MSG_USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const MSG_EMAIL_TAKEN: &str = "A user is already registered with this email address.";
pub const MSG_PASSWORD_MISMATCH: &str = "You must type the same password each time.";
pub const MSG_ADDRESS_TOO_LONG: &str = "Ensure this value has at most 255 characters.";

/// Letters, digits and `@ . + - _`, the characters allowed in a username.
pub fn validate_username_chars(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_username");
        error.message = Some(Cow::Borrowed(MSG_INVALID_USERNAME));
        Err(error)
    }
}

/// Parses a submitted `tipo`. `admin` is only accepted when `allow_admin` is set.
pub fn parse_role(value: &str, allow_admin: bool) -> Result<Role, String> {
    if value.is_empty() {
        return Err(MSG_REQUIRED.to_string());
    }
    match value.parse::<Role>() {
        Ok(role) if allow_admin || role.is_self_registrable() => Ok(role),
        _ => Err(format!(
            "Select a valid choice. {} is not one of the available choices.",
            value
        )),
    }
}

/// Blank addresses are stored as absent.
pub fn normalize_address(address: Option<String>) -> Option<String> {
    address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}

/// Case-insensitive username lookup, ignoring the account `exclude` if given.
pub async fn username_taken<C>(db: &C, username: &str, exclude: Option<i32>) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    trace!("Checking whether username '{}' is taken", username);
    let mut query = user::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col(user::Column::Username))).eq(username.to_lowercase()),
    );
    if let Some(id) = exclude {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Case-insensitive email lookup, ignoring the account `exclude` if given.
pub async fn email_taken<C>(db: &C, email: &str, exclude: Option<i32>) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    trace!("Checking whether email '{}' is taken", email);
    let mut query = user::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col(user::Column::Email))).eq(email.to_lowercase()),
    );
    if let Some(id) = exclude {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}
