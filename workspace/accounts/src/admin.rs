//! Administrative account operations.
//!
//! Staff can list, inspect, create, edit and delete accounts, including the
//! `tipo` and `direccion` fields. Unlike self-registration the admin may
//! assign the `admin` type, and omitting `tipo` leaves the model default.

use model::entities::user::{self, Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AccountsError, AccountsResult, username_conflict};
use crate::field_errors::FieldErrors;
use crate::password::{UserAttributes, hash_password, validate_password};
use crate::validation::{
    MSG_EMAIL_TAKEN, MSG_PASSWORD_MISMATCH, MSG_REQUIRED, MSG_USERNAME_TAKEN, email_taken,
    normalize_address, parse_role, username_taken, validate_username_chars,
};

/// Account creation from the admin surface.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct NewAccount {
    #[validate(
        length(min = 1, max = 150, message = "Ensure this value has between 1 and 150 characters."),
        custom(function = "validate_username_chars")
    )]
    pub username: String,
    pub password1: String,
    pub password2: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: Option<String>,
    /// `cliente`, `transportista` or `admin`; the model default applies when omitted
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub direccion: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_staff: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
}

/// Partial account edit. Absent fields are left untouched; an empty
/// `direccion` clears the address.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct AccountChanges {
    #[validate(
        length(min = 1, max = 150, message = "Ensure this value has between 1 and 150 characters."),
        custom(function = "validate_username_chars")
    )]
    pub username: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: Option<String>,
    pub tipo: Option<String>,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub direccion: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    /// New password, hashed before storage
    pub password: Option<String>,
}

/// One page of accounts.
#[derive(Debug, Clone)]
pub struct AccountPage {
    pub accounts: Vec<user::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// List accounts ordered by id, optionally restricted to one `tipo`.
/// `page` is 1-based.
#[instrument(skip(db))]
pub async fn list_accounts<C>(
    db: &C,
    role: Option<Role>,
    page: u64,
    per_page: u64,
) -> AccountsResult<AccountPage>
where
    C: ConnectionTrait,
{
    let mut query = user::Entity::find().order_by_asc(user::Column::Id);
    if let Some(role) = role {
        query = query.filter(user::Column::Role.eq(role));
    }

    let paginator = query.paginate(db, per_page.max(1));
    let total = paginator.num_items().await?;
    let accounts = paginator.fetch_page(page.saturating_sub(1)).await?;
    debug!("Fetched {} of {} accounts", accounts.len(), total);

    Ok(AccountPage {
        accounts,
        total,
        page,
        per_page,
    })
}

#[instrument(skip(db))]
pub async fn get_account<C>(db: &C, account_id: i32) -> AccountsResult<user::Model>
where
    C: ConnectionTrait,
{
    user::Entity::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(AccountsError::NotFound(account_id))
}

/// Create an account on behalf of an administrator.
#[instrument(skip(db, input), fields(username = %input.username))]
pub async fn create_account<C>(db: &C, input: NewAccount) -> AccountsResult<user::Model>
where
    C: ConnectionTrait,
{
    let username = input.username.trim().to_string();
    let email = input.email.as_deref().unwrap_or("").trim().to_string();

    let trimmed = NewAccount {
        username: username.clone(),
        email: input.email.as_deref().map(|e| e.trim().to_string()),
        ..input.clone()
    };
    let mut errors = match trimmed.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    if username.is_empty() {
        errors.remove("username");
        errors.add("username", MSG_REQUIRED);
    } else if !errors.contains("username") && username_taken(db, &username, None).await? {
        errors.add("username", MSG_USERNAME_TAKEN);
    }
    if !email.is_empty() && !errors.contains("email") && email_taken(db, &email, None).await? {
        errors.add("email", MSG_EMAIL_TAKEN);
    }

    if input.password1.is_empty() {
        errors.add("password1", MSG_REQUIRED);
    } else {
        let attributes = UserAttributes {
            username: &username,
            email: &email,
            first_name: input.first_name.as_deref().unwrap_or(""),
            last_name: input.last_name.as_deref().unwrap_or(""),
        };
        for message in validate_password(&input.password1, &attributes) {
            errors.add("password1", message);
        }
    }
    if input.password2.is_empty() {
        errors.add("password2", MSG_REQUIRED);
    } else if input.password1 != input.password2 {
        errors.add("password2", MSG_PASSWORD_MISMATCH);
    }

    let role = match input.tipo.as_deref() {
        None => None,
        Some(value) => match parse_role(value, true) {
            Ok(role) => Some(role),
            Err(message) => {
                errors.add("tipo", message);
                None
            }
        },
    };
    errors.into_result()?;

    let mut account = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        password: Set(hash_password(&input.password1)?),
        first_name: Set(input.first_name.unwrap_or_default()),
        last_name: Set(input.last_name.unwrap_or_default()),
        address: Set(normalize_address(input.direccion)),
        ..Default::default()
    };
    if let Some(role) = role {
        account.role = Set(role);
    }
    if let Some(is_active) = input.is_active {
        account.is_active = Set(is_active);
    }
    if let Some(is_staff) = input.is_staff {
        account.is_staff = Set(is_staff);
    }
    if let Some(is_superuser) = input.is_superuser {
        account.is_superuser = Set(is_superuser);
    }

    let account = account
        .insert(db)
        .await
        .map_err(|e| username_conflict(e, &trimmed.username))?;
    info!(
        "Admin created account {} with id {} as {}",
        account,
        account.id,
        account.role.as_str()
    );
    Ok(account)
}

/// Apply an admin edit to an existing account.
#[instrument(skip(db, changes))]
pub async fn update_account<C>(
    db: &C,
    account_id: i32,
    changes: AccountChanges,
) -> AccountsResult<user::Model>
where
    C: ConnectionTrait,
{
    let existing = get_account(db, account_id).await?;

    let trimmed = AccountChanges {
        username: changes.username.as_deref().map(|u| u.trim().to_string()),
        email: changes.email.as_deref().map(|e| e.trim().to_string()),
        ..changes.clone()
    };
    let mut errors = match trimmed.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    let username = changes.username.as_deref().map(str::trim);
    if let Some(username) = username {
        if !errors.contains("username")
            && username_taken(db, username, Some(account_id)).await?
        {
            errors.add("username", MSG_USERNAME_TAKEN);
        }
    }
    let email = changes.email.as_deref().map(str::trim);
    if let Some(email) = email {
        if !email.is_empty()
            && !errors.contains("email")
            && email_taken(db, email, Some(account_id)).await?
        {
            errors.add("email", MSG_EMAIL_TAKEN);
        }
    }

    let role = match changes.tipo.as_deref() {
        None => None,
        Some(value) => match parse_role(value, true) {
            Ok(role) => Some(role),
            Err(message) => {
                errors.add("tipo", message);
                None
            }
        },
    };

    if let Some(password) = changes.password.as_deref() {
        let attributes = UserAttributes {
            username: username.unwrap_or(&existing.username),
            email: email.unwrap_or(&existing.email),
            first_name: changes.first_name.as_deref().unwrap_or(&existing.first_name),
            last_name: changes.last_name.as_deref().unwrap_or(&existing.last_name),
        };
        if password.is_empty() {
            errors.add("password", MSG_REQUIRED);
        }
        for message in validate_password(password, &attributes) {
            errors.add("password", message);
        }
    }
    errors.into_result()?;

    let mut updated_fields = Vec::new();
    let mut account = existing.into_active_model();

    if let Some(username) = username {
        account.username = Set(username.to_string());
        updated_fields.push("username");
    }
    if let Some(email) = email {
        account.email = Set(email.to_string());
        updated_fields.push("email");
    }
    if let Some(first_name) = changes.first_name {
        account.first_name = Set(first_name);
        updated_fields.push("first_name");
    }
    if let Some(last_name) = changes.last_name {
        account.last_name = Set(last_name);
        updated_fields.push("last_name");
    }
    if let Some(role) = role {
        account.role = Set(role);
        updated_fields.push("tipo");
    }
    if changes.direccion.is_some() {
        account.address = Set(normalize_address(changes.direccion));
        updated_fields.push("direccion");
    }
    if let Some(is_active) = changes.is_active {
        account.is_active = Set(is_active);
        updated_fields.push("is_active");
    }
    if let Some(is_staff) = changes.is_staff {
        account.is_staff = Set(is_staff);
        updated_fields.push("is_staff");
    }
    if let Some(is_superuser) = changes.is_superuser {
        account.is_superuser = Set(is_superuser);
        updated_fields.push("is_superuser");
    }
    if let Some(password) = changes.password.as_deref() {
        account.password = Set(hash_password(password)?);
        updated_fields.push("password");
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for account {}", account_id);
    }

    let account = account
        .update(db)
        .await
        .map_err(|e| username_conflict(e, username.unwrap_or_default()))?;
    info!(
        "Account {} updated. Updated fields: {}",
        account_id,
        if updated_fields.is_empty() {
            "none".to_string()
        } else {
            updated_fields.join(", ")
        }
    );
    Ok(account)
}

#[instrument(skip(db))]
pub async fn delete_account<C>(db: &C, account_id: i32) -> AccountsResult<()>
where
    C: ConnectionTrait,
{
    let result = user::Entity::delete_by_id(account_id).exec(db).await?;
    if result.rows_affected == 0 {
        warn!("Account {} not found for deletion", account_id);
        return Err(AccountsError::NotFound(account_id));
    }
    info!("Account {} deleted", account_id);
    Ok(())
}
