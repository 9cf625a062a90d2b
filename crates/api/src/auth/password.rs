//! Argon2id password hashing.
//!
//! Stored values are PHC strings (`$argon2id$v=19$...`), so parameters and
//! salt are read back from the hash itself on verification.

use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use uuid::Uuid;

/// Hash of a random secret nobody knows. Verifying against it costs the same
/// as verifying a real account.
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password(&Uuid::new_v4().to_string()).ok());

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Check `password` against a stored PHC string.
///
/// A mismatch is `Ok(false)`. `Err` means the stored value is not a usable
/// hash, which sign-in reports as an internal error rather than bad
/// credentials.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Spend one Argon2 verification on a sign-in for an email with no account.
pub fn verify_unknown_account(password: &str) {
    if let Some(hash) = UNKNOWN_ACCOUNT_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}
