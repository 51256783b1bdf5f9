//! Self-service registration.
//!
//! A [`SignupForm`] carries the base identity fields plus the account type
//! (`tipo`) and address (`direccion`). [`SignupForm::clean`] runs every rule
//! and reports all failures at once, keyed by field; [`SignupForm::save`]
//! builds the complete account and writes it in a single insert, so no reader
//! ever sees an account without its type and address.

use model::entities::user::{self, Role};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AccountsResult, username_conflict};
use crate::field_errors::FieldErrors;
use crate::password::{UserAttributes, hash_password, validate_password};
use crate::validation::{
    MSG_EMAIL_TAKEN, MSG_PASSWORD_MISMATCH, MSG_REQUIRED, MSG_USERNAME_TAKEN, email_taken,
    normalize_address, parse_role, username_taken, validate_username_chars,
};

/// Registration submission.
#[derive(Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct SignupForm {
    /// Unique login name, letters, digits and `@ . + - _` only
    #[validate(
        length(min = 1, max = 150, message = "Ensure this value has between 1 and 150 characters."),
        custom(function = "validate_username_chars")
    )]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    pub password1: String,
    /// Must repeat `password1`
    pub password2: String,
    /// `cliente` or `transportista`
    #[serde(default)]
    pub tipo: String,
    /// Optional postal address
    #[serde(default)]
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub direccion: Option<String>,
}

impl std::fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("tipo", &self.tipo)
            .field("direccion", &self.direccion)
            .finish_non_exhaustive()
    }
}

/// Signup data that passed validation.
#[derive(Clone, PartialEq, Eq)]
pub struct CleanedSignup {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub address: Option<String>,
    password: String,
}

impl std::fmt::Debug for CleanedSignup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanedSignup")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl SignupForm {
    /// Validate the submission against the account store.
    #[instrument(skip(db))]
    pub async fn clean<C>(&self, db: &C) -> AccountsResult<CleanedSignup>
    where
        C: ConnectionTrait,
    {
        let username = self.username.trim().to_string();
        let email = self.email.trim().to_string();

        // Field rules apply to the values that will be stored
        let trimmed = SignupForm {
            username: username.clone(),
            email: email.clone(),
            ..self.clone()
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

        if email.is_empty() {
            errors.remove("email");
            errors.add("email", MSG_REQUIRED);
        } else if !errors.contains("email") && email_taken(db, &email, None).await? {
            errors.add("email", MSG_EMAIL_TAKEN);
        }

        if self.password1.is_empty() {
            errors.add("password1", MSG_REQUIRED);
        } else {
            let attributes = UserAttributes {
                username: &username,
                email: &email,
                ..Default::default()
            };
            for message in validate_password(&self.password1, &attributes) {
                errors.add("password1", message);
            }
        }

        if self.password2.is_empty() {
            errors.add("password2", MSG_REQUIRED);
        } else if !self.password1.is_empty() && self.password1 != self.password2 {
            errors.add("password2", MSG_PASSWORD_MISMATCH);
        }

        let role = match parse_role(&self.tipo, false) {
            Ok(role) => Some(role),
            Err(message) => {
                errors.add("tipo", message);
                None
            }
        };

        if !errors.is_empty() {
            debug!("Signup for '{}' rejected: {}", username, errors);
        }
        errors.into_result()?;

        Ok(CleanedSignup {
            username,
            email,
            role: role.unwrap_or_default(),
            address: normalize_address(self.direccion.clone()),
            password: self.password1.clone(),
        })
    }

    /// Validate and create the account.
    ///
    /// On any validation failure nothing is written.
    #[instrument(skip(db))]
    pub async fn save<C>(&self, db: &C) -> AccountsResult<user::Model>
    where
        C: ConnectionTrait,
    {
        let cleaned = self.clean(db).await?;
        let password = hash_password(&cleaned.password)?;

        let new_account = user::ActiveModel {
            username: Set(cleaned.username.clone()),
            email: Set(cleaned.email),
            password: Set(password),
            role: Set(cleaned.role),
            address: Set(cleaned.address),
            ..Default::default()
        };

        let account = new_account
            .insert(db)
            .await
            .map_err(|e| username_conflict(e, &cleaned.username))?;

        info!(
            "Account {} registered with id {} as {}",
            account,
            account.id,
            account.role.as_str()
        );
        Ok(account)
    }
}
