//! Account management for the returns platform: self-service signup,
//! credential checks and the administrative account operations.
//!
//! Everything here works on a plain `sea_orm::DatabaseConnection` so the HTTP
//! layer and the CLI share the same rules.

pub mod admin;
pub mod auth;
pub mod error;
pub mod field_errors;
pub mod password;
pub mod signup;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{AccountsError, AccountsResult};
pub use field_errors::FieldErrors;
pub use signup::SignupForm;
