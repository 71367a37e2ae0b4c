//! Expiry computation for end-user credentials.
//!
//! A credential either expires at a concrete instant or carries the
//! lifetime sentinel (year 9999). Sentinel detection is by year, so an
//! explicitly supplied year-9999 expiry behaves like a lifetime key.

use crate::domain::{AuthError, EndUserCredential, StoreError, StorePtr};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use uuid::Uuid;

/// Year marking a non-expiring credential.
pub const LIFETIME_YEAR: i32 = 9999;

/// The maximal expiry stored for `days == 0` (lifetime) credentials.
pub fn lifetime_expiry() -> DateTime<Utc> {
    // ---
    Utc.with_ymd_and_hms(LIFETIME_YEAR, 12, 31, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether `expires_at` denotes a lifetime (non-expiring) credential.
pub fn is_lifetime(expires_at: DateTime<Utc>) -> bool {
    // ---
    expires_at.year() >= LIFETIME_YEAR
}

/// Expiry for a newly created credential.
///
/// An explicit expiry wins when present; otherwise `days == 0` means
/// lifetime and any other value is added to `now`.
pub fn creation_expiry(
    now: DateTime<Utc>,
    days: u32,
    explicit: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    // ---
    if let Some(expiry) = explicit {
        return expiry;
    }

    if days == 0 {
        lifetime_expiry()
    } else {
        now + Duration::days(i64::from(days))
    }
}

/// Expiry after extending by `days`, or `None` for lifetime credentials,
/// which cannot be extended.
///
/// Extension stacks on remaining time while the credential is still live
/// and restarts from `now` once it has expired.
pub fn extended_expiry(
    now: DateTime<Utc>,
    current: DateTime<Utc>,
    days: u32,
) -> Option<DateTime<Utc>> {
    // ---
    if is_lifetime(current) {
        return None;
    }

    let base = now.max(current);
    Some(base + Duration::days(i64::from(days)))
}

/// Create and persist a credential for `(app_id, username)`.
///
/// Uniqueness of the pair is enforced by the store insert itself; a
/// conflicting concurrent create cannot produce two records.
pub async fn issue_credential(
    store: &StorePtr,
    app_id: Uuid,
    username: String,
    password: String,
    days: u32,
    explicit_expiry: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<EndUserCredential, AuthError> {
    // ---
    let expires_at = creation_expiry(now, days, explicit_expiry);
    let credential = EndUserCredential::new(app_id, username, password, expires_at);

    match store.insert_credential(credential.clone()).await {
        Ok(()) => Ok(credential),
        Err(StoreError::Conflict) => Err(AuthError::DuplicateUsername),
        Err(err) => Err(err.into()),
    }
}

/// Advance a credential's expiry by `days`.
///
/// Lifetime credentials are returned unchanged.
pub async fn extend_credential(
    store: &StorePtr,
    id: Uuid,
    days: u32,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, AuthError> {
    // ---
    let credential = store
        .get_credential_by_id(id)
        .await?
        .ok_or(AuthError::NotFound)?;

    let Some(new_expiry) = extended_expiry(now, credential.expires_at, days) else {
        return Ok(credential.expires_at);
    };

    match store.update_expiry(id, new_expiry).await {
        Ok(()) => Ok(new_expiry),
        Err(StoreError::NotFound) => Err(AuthError::NotFound),
        Err(err) => Err(err.into()),
    }
}
