//! Password hashing
//!
//! Argon2id with a per-user random salt. `password_hash` holds the PHC string
//! (`$argon2id$v=19$...`), `password_salt` the B64 salt it was derived with.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use crate::error::{Error, Result};

/// Generate a random B64-encoded salt
pub fn generate_salt() -> String {
    SaltString::generate(&mut OsRng).as_str().to_string()
}

/// Hash a password with the given salt into a PHC string
pub fn hash_password(password: &str, salt: &str) -> Result<String> {
    let salt = SaltString::from_b64(salt)
        .map_err(|e| Error::PasswordHash(format!("invalid salt: {}", e)))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check a candidate password against a stored PHC string
///
/// Unparseable or empty hashes never verify.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
