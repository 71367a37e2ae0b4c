//! Seller password hashing and verification using argon2id.

use crate::domain::IdentityHasher;
use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

pub struct Argon2Hasher;

impl Argon2Hasher {
    // ---
    pub fn new() -> Self {
        // ---
        Argon2Hasher
    }
}

impl IdentityHasher for Argon2Hasher {
    // ---
    fn hash(&self, password: &str) -> Result<String> {
        // ---
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| anyhow!("password hashing failed: {err}"))?;

        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        // ---
        let parsed =
            PasswordHash::new(hash).map_err(|err| anyhow!("stored hash is malformed: {err}"))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
