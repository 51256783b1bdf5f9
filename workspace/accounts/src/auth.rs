use model::entities::user::{self, Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{AccountsError, AccountsResult, username_conflict};
use crate::field_errors::FieldErrors;
use crate::password::{UserAttributes, hash_password, validate_password, verify_password};
use crate::validation::{
    MSG_INVALID_USERNAME, MSG_REQUIRED, MSG_USERNAME_TAKEN, USERNAME_MAX_LENGTH, username_taken,
    validate_username_chars,
};

/// Check a username/password pair.
///
/// Unknown usernames, wrong passwords and inactive accounts all yield
/// [`AccountsError::InvalidCredentials`].
#[instrument(skip(db, password))]
pub async fn authenticate<C>(db: &C, username: &str, password: &str) -> AccountsResult<user::Model>
where
    C: ConnectionTrait,
{
    let account = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    let Some(account) = account else {
        debug!("No account named '{}'", username);
        // Hash anyway so unknown names take as long as wrong passwords
        let _ = hash_password(password);
        return Err(AccountsError::InvalidCredentials);
    };

    if !verify_password(password, &account.password) {
        warn!("Wrong password for account '{}'", username);
        return Err(AccountsError::InvalidCredentials);
    }
    if !account.is_active {
        warn!("Inactive account '{}' tried to authenticate", username);
        return Err(AccountsError::InvalidCredentials);
    }

    Ok(account)
}

/// Authenticate and record the login time.
#[instrument(skip(db, password))]
pub async fn login<C>(db: &C, username: &str, password: &str) -> AccountsResult<user::Model>
where
    C: ConnectionTrait,
{
    let account = authenticate(db, username, password).await?;

    let mut active = account.into_active_model();
    active.last_login = Set(Some(chrono::Utc::now()));
    let account = active.update(db).await?;

    info!("Account {} logged in", account);
    Ok(account)
}

/// Create an administrator: role `admin`, staff and superuser.
#[instrument(skip(db, password))]
pub async fn create_superuser<C>(
    db: &C,
    username: &str,
    email: &str,
    password: &str,
) -> AccountsResult<user::Model>
where
    C: ConnectionTrait,
{
    let username = username.trim();
    let mut errors = FieldErrors::new();

    if username.is_empty() {
        errors.add("username", MSG_REQUIRED);
    } else if username.chars().count() > USERNAME_MAX_LENGTH
        || validate_username_chars(username).is_err()
    {
        errors.add("username", MSG_INVALID_USERNAME);
    } else if username_taken(db, username, None).await? {
        errors.add("username", MSG_USERNAME_TAKEN);
    }

    let attributes = UserAttributes {
        username,
        email,
        ..Default::default()
    };
    for message in validate_password(password, &attributes) {
        errors.add("password", message);
    }
    errors.into_result()?;

    let account = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.trim().to_string()),
        password: Set(hash_password(password)?),
        role: Set(Role::Admin),
        is_staff: Set(true),
        is_superuser: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| username_conflict(e, username))?;

    info!("Superuser {} created with id {}", account, account.id);
    Ok(account)
}
