use std::collections::HashMap;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{debug, error};

use crate::error::{AccountsError, AccountsResult};

pub const MIN_LENGTH: usize = 8;
const MAX_SIMILARITY: f64 = 0.7;

/// Frequently used passwords that are refused outright, one per line, lowercase.
const COMMON_PASSWORDS: &str = include_str!("../data/common_passwords.txt");

fn is_common(password: &str) -> bool {
    let lowered = password.trim().to_lowercase();
    COMMON_PASSWORDS.lines().any(|line| line.trim() == lowered)
}

/// Account attributes a password must not resemble.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserAttributes<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> AccountsResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            AccountsError::PasswordHash(e.to_string())
        })
}

/// Check a password against a stored PHC string.
///
/// Unusable hashes (such as `"!"`) never verify.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            debug!("Stored password hash is unusable: {}", e);
            false
        }
    }
}

/// Run every password rule and collect the messages of the failing ones.
///
/// Rules: minimum length, not too similar to the account attributes, not a
/// common password, not entirely numeric.
pub fn validate_password(password: &str, attributes: &UserAttributes<'_>) -> Vec<String> {
    let mut messages = Vec::new();

    if password.chars().count() < MIN_LENGTH {
        messages.push(format!(
            "This password is too short. It must contain at least {} characters.",
            MIN_LENGTH
        ));
    }

    let checked = [
        (attributes.username, "username"),
        (attributes.first_name, "first name"),
        (attributes.last_name, "last name"),
        (attributes.email, "email address"),
    ];
    for (value, verbose_name) in checked {
        if is_too_similar(password, value) {
            messages.push(format!("The password is too similar to the {}.", verbose_name));
            break;
        }
    }

    if is_common(password) {
        messages.push("This password is too common.".to_string());
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        messages.push("This password is entirely numeric.".to_string());
    }

    messages
}

/// Whether `password` resembles `value` or one of its word-separated parts.
fn is_too_similar(password: &str, value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    let password = password.to_lowercase();
    let value = value.to_lowercase();

    let parts = value
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|part| !part.is_empty())
        .chain(std::iter::once(value.as_str()));

    for part in parts {
        if exceeds_length_ratio(&password, part) {
            continue;
        }
        if quick_ratio(&password, part) >= MAX_SIMILARITY {
            return true;
        }
    }
    false
}

/// Long passwords can't resemble short attribute values, skip those pairs.
fn exceeds_length_ratio(password: &str, value: &str) -> bool {
    let password_len = password.chars().count() as f64;
    let value_len = value.chars().count() as f64;
    let length_bound = MAX_SIMILARITY / 2.0 * password_len;
    password_len >= 10.0 * value_len && value_len < length_bound
}

/// Upper bound on the matching-blocks ratio: twice the shared characters
/// (as a multiset) over the combined length.
fn quick_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }
    let mut available: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }
    let mut matches = 0usize;
    for c in a.chars() {
        if let Some(count) = available.get_mut(&c) {
            if *count > 0 {
                *count -= 1;
                matches += 1;
            }
        }
    }
    2.0 * matches as f64 / total as f64
}
