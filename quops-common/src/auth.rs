//! Admin credential checking and session state
//!
//! Passwords are stored as salted SHA-256 hashes in the admin_users table.
//! The session is a server-held state flag, not a client token: the admin
//! service holds one `SessionState` and gates every write path on it.

use crate::Result;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

/// Login session state of the admin service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    AdminAuthenticated,
}

impl SessionState {
    pub fn is_admin(&self) -> bool {
        matches!(self, SessionState::AdminAuthenticated)
    }
}

/// Generate a random hex salt
pub fn generate_salt() -> String {
    use rand::Rng;
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Salted SHA-256 password hash, 64 hex characters
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a username/password pair against the credential table.
///
/// Returns `true` only when the user exists and the hash matches; the
/// caller must not distinguish unknown-user from wrong-password in any
/// user-visible message.
pub async fn verify_credentials(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<bool> {
    let row: Option<(String, String)> = sqlx::query_as(
        "SELECT password_hash, password_salt FROM admin_users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    match row {
        Some((stored_hash, salt)) => Ok(hash_password(password, &salt) == stored_hash),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_salt_sensitive() {
        let h1 = hash_password("secret", "00ff");
        let h2 = hash_password("secret", "00ff");
        let h3 = hash_password("secret", "11ff");
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn salts_are_unique() {
        let a = generate_salt();
        let b = generate_salt();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
