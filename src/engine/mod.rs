//! License lifecycle engine.
//!
//! Pure credential logic: expiry computation on creation, the login/HWID
//! validation state machine, and expiry extension. Persistence and
//! notification go through the `domain` traits, so every function here is
//! backend-agnostic.

mod expiry;
mod login;

pub use expiry::{
    creation_expiry, extend_credential, extended_expiry, is_lifetime, issue_credential,
    lifetime_expiry, LIFETIME_YEAR,
};
pub use login::{authenticate, LoginAttempt, LoginGrant};
