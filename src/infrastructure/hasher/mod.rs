mod argon2_hasher;

pub use argon2_hasher::Argon2Hasher;
use std::sync::Arc;

/// Creates the argon2id-backed seller password hasher.
pub fn create_argon2_hasher() -> crate::domain::HasherPtr {
    // ---
    Arc::new(Argon2Hasher::new())
}
