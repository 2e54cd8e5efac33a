//! Password hashing
//!
//! Passwords are stored as argon2id PHC strings with a random salt.
//! The stored column holds at most [`PASSWORD_MAX_LEN`] characters.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::{Error, Result};

/// Maximum length of the stored password hash
pub const PASSWORD_MAX_LEN: usize = 100;

#[cfg(not(test))]
fn hasher() -> Argon2<'static> {
    Argon2::default()
}

// Unit tests hash a lot of passwords; keep the work factor low there.
#[cfg(test)]
fn hasher() -> Argon2<'static> {
    let params = argon2::Params::new(1024, 1, 1, None).expect("valid test params");
    Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = hasher()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(e.to_string()))?
        .to_string();

    if hash.len() > PASSWORD_MAX_LEN {
        return Err(Error::PasswordHash(format!(
            "hash is {} characters, column allows {}",
            hash.len(),
            PASSWORD_MAX_LEN
        )));
    }

    Ok(hash)
}

/// Verify a plaintext password against a stored argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::error!("failed to parse password hash: {}", err);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
