use anyhow::Result;
use std::sync::Arc;

/// One-way hashing for seller passwords.
///
/// End-user credentials are compared by exact match and never pass through
/// this trait.
pub trait IdentityHasher: Send + Sync {
    // ---
    /// Hash a password with a fresh random salt.
    fn hash(&self, password: &str) -> Result<String>;

    /// Verify a password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Type alias for any backend that implements IdentityHasher.
pub type HasherPtr = Arc<dyn IdentityHasher>;
