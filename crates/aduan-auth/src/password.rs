//! Password policy and Argon2id verification.

use std::borrow::Cow;

use aduan_core::error::{AduanError, AduanResult};
use argon2::{Argon2, PasswordVerifier};

use crate::error::AuthError;

/// Prepend the server-side pepper, if any.
fn peppered<'a>(password: &'a str, pepper: Option<&str>) -> Cow<'a, [u8]> {
    match pepper {
        Some(p) => Cow::Owned(format!("{p}{password}").into_bytes()),
        None => Cow::Borrowed(password.as_bytes()),
    }
}

/// Verify a plaintext password against an Argon2id PHC-format hash.
///
/// `pepper` must match the one used when the hash was produced. Returns
/// `Ok(false)` on mismatch and [`AuthError::Crypto`] if the stored hash is
/// malformed.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(&peppered(password, pepper), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}

/// Reject passwords shorter than `min_length` characters.
pub fn check_strength(password: &str, min_length: usize) -> AduanResult<()> {
    if password.chars().count() < min_length {
        return Err(AduanError::validation(format!(
            "password must be at least {min_length} characters"
        )));
    }
    Ok(())
}
