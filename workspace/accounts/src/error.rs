use sea_orm::{DbErr, SqlErr};
use tracing::warn;
use thiserror::Error;

use crate::field_errors::FieldErrors;
use crate::validation::MSG_USERNAME_TAKEN;

/// Error types for account operations
#[derive(Error, Debug)]
pub enum AccountsError {
    /// One or more submitted fields are invalid. Nothing was written.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Hashing or parsing a stored password failed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Unknown username, wrong password or inactive account
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account {0} not found")]
    NotFound(i32),
}

impl AccountsError {
    /// Shorthand for a validation error on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        AccountsError::Validation(errors)
    }
}

/// Turn a failed account write into an error.
///
/// The only unique indexes on `users` cover the username (exact and
/// lowercased), so a unique violation means another writer took the name
/// between validation and the write.
pub(crate) fn username_conflict(err: DbErr, username: &str) -> AccountsError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            warn!("Username '{}' was taken concurrently", username);
            AccountsError::field("username", MSG_USERNAME_TAKEN)
        }
        _ => AccountsError::Database(err),
    }
}

/// Result type for account operations
pub type AccountsResult<T> = Result<T, AccountsError>;
