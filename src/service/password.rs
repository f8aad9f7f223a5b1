use argon2::{
    password_hash::{PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use rand::RngCore;
use std::sync::OnceLock;

use crate::service::validation::ValidationError;

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(String);

/// Checks the strength policy and reports the first rule the password breaks.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::new(
            "The password must be at least 8 characters long.",
        ));
    }

    if !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::new(
            "The password must contain at least one uppercase character.",
        ));
    }

    if !password.chars().any(char::is_lowercase) {
        return Err(ValidationError::new(
            "The password must contain at least one lowercase character.",
        ));
    }

    if !password.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::new(
            "The password must contain at least one digit.",
        ));
    }

    if !password
        .chars()
        .any(|ch| PASSWORD_SPECIAL_CHARACTERS.contains(ch))
    {
        return Err(ValidationError::new(
            "The password must contain at least one special character (e.g., !@#$%^&*()).",
        ));
    }

    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt =
        SaltString::encode_b64(&salt).map_err(|err| PasswordHashError(err.to_string()))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| PasswordHashError(err.to_string()))?
        .to_string();
    Ok(hash)
}

/// `false` for a wrong password and for an unparsable stored hash.
pub fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::warn!("stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Runs a full verify against a throwaway hash and always returns `false`.
///
/// Login paths that fail before reaching a stored hash call this so they cost
/// the same as a wrong password.
pub fn verify_against_placeholder(password: &str) -> bool {
    static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
    let placeholder = PLACEHOLDER.get_or_init(|| {
        let mut secret = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        hash_password(&hex_encode(&secret)).ok()
    });
    if let Some(hash) = placeholder {
        verify_password(hash, password);
    }
    false
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
