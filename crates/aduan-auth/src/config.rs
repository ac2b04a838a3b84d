//! Authentication configuration.

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 private key for JWT signing.
    pub jwt_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for JWT verification.
    pub jwt_public_key_pem: String,
    /// Session token lifetime in seconds (default: 604_800 = 7 days).
    pub session_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Optional pepper prepended to passwords before Argon2id verification.
    /// Must match the pepper the user store hashes with.
    pub pepper: Option<String>,
    /// Minimum password length for registration and password changes.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_private_key_pem: String::new(),
            jwt_public_key_pem: String::new(),
            session_lifetime_secs: 604_800,
            jwt_issuer: "aduan".into(),
            pepper: None,
            min_password_length: 8,
        }
    }
}
