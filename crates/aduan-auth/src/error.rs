//! Authentication error types.

use aduan_core::error::AduanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("current password is incorrect")]
    WrongCurrentPassword,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for AduanError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::WrongCurrentPassword
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => AduanError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => AduanError::Crypto(msg),
        }
    }
}
