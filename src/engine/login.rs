//! Client login validation.
//!
//! The checks run in strict order and the first failure wins. HWID binding
//! goes through the store's conditional update, so two concurrent first
//! logins for the same credential cannot both bind.

use crate::domain::{AuthError, LoginEvent, NotifierPtr, StorePtr};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::expiry::is_lifetime;

/// One client login attempt, already boundary-validated.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    // ---
    pub owner_id: Uuid,
    pub app_secret: String,
    pub username: String,
    pub password: String,
    pub hwid: String,
    pub client_ip: String,
}

/// A granted login. The expiry is the only data a client gets back.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    // ---
    pub expires_at: DateTime<Utc>,
}

/// Run the login state machine for one attempt.
///
/// Order of checks: application, credential, password, expiry, HWID.
/// On success the application's webhook (when enabled) is notified on a
/// detached task; delivery never affects the returned grant.
pub async fn authenticate(
    store: &StorePtr,
    notifier: &NotifierPtr,
    attempt: LoginAttempt,
    now: DateTime<Utc>,
) -> Result<LoginGrant, AuthError> {
    // ---
    let app = store
        .get_application_by_secret(attempt.owner_id, &attempt.app_secret)
        .await?
        .ok_or(AuthError::InvalidApplication)?;

    let credential = store
        .get_credential(app.app_id, &attempt.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    // End-user passwords are stored and compared verbatim (see DESIGN.md).
    if credential.password != attempt.password {
        return Err(AuthError::InvalidCredentials);
    }

    if !is_lifetime(credential.expires_at) && credential.expires_at < now {
        return Err(AuthError::SubscriptionExpired);
    }

    match credential.hwid.as_deref() {
        None => bind_first_use(store, credential.id, &attempt.hwid).await?,
        Some(stored) if stored != attempt.hwid => return Err(AuthError::HwidMismatch),
        Some(_) => {}
    }

    if let Some(config) = app.webhook.clone().filter(|c| c.enabled) {
        notifier.login_succeeded(
            LoginEvent {
                app_name: app.name.clone(),
                username: credential.username.clone(),
                hwid: attempt.hwid.clone(),
                client_ip: attempt.client_ip.clone(),
                expires_at: credential.expires_at,
            },
            config,
        );
    }

    Ok(LoginGrant {
        expires_at: credential.expires_at,
    })
}

/// First-use binding. The conditional update either wins the race, or we
/// re-read to learn which HWID won; a different winner is a mismatch.
async fn bind_first_use(store: &StorePtr, id: Uuid, hwid: &str) -> Result<(), AuthError> {
    // ---
    if store.try_bind_hwid(id, hwid).await? {
        return Ok(());
    }

    let current = store
        .get_credential_by_id(id)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    match current.hwid.as_deref() {
        Some(winner) if winner == hwid => Ok(()),
        _ => Err(AuthError::HwidMismatch),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::domain::{Application, Notifier, WebhookConfig};
    use crate::engine::issue_credential;
    use crate::infrastructure::create_memory_store;
    use chrono::Duration;
    use std::sync::{Arc, Mutex};

    /// Captures every event instead of delivering it.
    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<(LoginEvent, WebhookConfig)>>,
    }

    impl Notifier for RecordingNotifier {
        // ---
        fn login_succeeded(&self, event: LoginEvent, config: WebhookConfig) {
            self.events.lock().unwrap().push((event, config));
        }
    }

    struct Fixture {
        store: StorePtr,
        notifier: NotifierPtr,
        recorder: Arc<RecordingNotifier>,
        app: Application,
    }

    async fn fixture() -> Fixture {
        // ---
        let store = create_memory_store();
        let recorder = Arc::new(RecordingNotifier::default());
        let notifier: NotifierPtr = recorder.clone();

        let app = Application::new(
            "Test App".to_string(),
            Uuid::new_v4(),
            "a1b2c3d4".to_string(),
        );
        store
            .create_application(app.clone())
            .await
            .expect("app create should succeed");

        Fixture {
            store,
            notifier,
            recorder,
            app,
        }
    }

    fn attempt_for(app: &Application, username: &str, password: &str, hwid: &str) -> LoginAttempt {
        // ---
        LoginAttempt {
            owner_id: app.owner_id,
            app_secret: app.app_secret.clone(),
            username: username.to_string(),
            password: password.to_string(),
            hwid: hwid.to_string(),
            client_ip: "203.0.113.7".to_string(),
        }
    }

    #[tokio::test]
    async fn first_login_binds_hwid_and_later_mismatch_fails() {
        // ---
        let fx = fixture().await;
        let now = Utc::now();

        let credential = issue_credential(
            &fx.store,
            fx.app.app_id,
            "alice".into(),
            "pw1".into(),
            30,
            None,
            now,
        )
        .await
        .expect("create should succeed");

        // First login binds H1.
        let grant = authenticate(
            &fx.store,
            &fx.notifier,
            attempt_for(&fx.app, "alice", "pw1", "H1"),
            now,
        )
        .await
        .expect("first login should succeed");
        assert_eq!(grant.expires_at, credential.expires_at);

        let stored = fx
            .store
            .get_credential_by_id(credential.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.hwid.as_deref(), Some("H1"));

        // Same HWID keeps working.
        authenticate(
            &fx.store,
            &fx.notifier,
            attempt_for(&fx.app, "alice", "pw1", "H1"),
            now,
        )
        .await
        .expect("repeat login with bound HWID should succeed");

        // A different HWID is rejected from now on.
        let err = authenticate(
            &fx.store,
            &fx.notifier,
            attempt_for(&fx.app, "alice", "pw1", "H2"),
            now,
        )
        .await
        .expect_err("different HWID should fail");
        assert!(matches!(err, AuthError::HwidMismatch));
    }

    #[tokio::test]
    async fn failure_order_is_app_credential_password_expiry() {
        // ---
        let fx = fixture().await;
        let now = Utc::now();

        issue_credential(
            &fx.store,
            fx.app.app_id,
            "dave".into(),
            "pw".into(),
            1,
            None,
            now,
        )
        .await
        .expect("create should succeed");

        // Unknown app secret.
        let mut attempt = attempt_for(&fx.app, "dave", "pw", "H1");
        attempt.app_secret = "wrong".to_string();
        let err = authenticate(&fx.store, &fx.notifier, attempt, now)
            .await
            .expect_err("bad secret should fail");
        assert!(matches!(err, AuthError::InvalidApplication));

        // Unknown username.
        let err = authenticate(
            &fx.store,
            &fx.notifier,
            attempt_for(&fx.app, "nobody", "pw", "H1"),
            now,
        )
        .await
        .expect_err("unknown user should fail");
        assert!(matches!(err, AuthError::InvalidCredentials));

        // Wrong password.
        let err = authenticate(
            &fx.store,
            &fx.notifier,
            attempt_for(&fx.app, "dave", "wrong", "H1"),
            now,
        )
        .await
        .expect_err("wrong password should fail");
        assert!(matches!(err, AuthError::InvalidCredentials));

        // Expired: one-day credential, clock two days later.
        let err = authenticate(
            &fx.store,
            &fx.notifier,
            attempt_for(&fx.app, "dave", "pw", "H1"),
            now + Duration::days(2),
        )
        .await
        .expect_err("expired credential should fail");
        assert!(matches!(err, AuthError::SubscriptionExpired));

        // No failure bound an HWID.
        let stored = fx
            .store
            .get_credential(fx.app.app_id, "dave")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.hwid.is_none());
    }

    #[tokio::test]
    async fn lifetime_credential_outlives_any_clock() {
        // ---
        let fx = fixture().await;
        let now = Utc::now();

        issue_credential(
            &fx.store,
            fx.app.app_id,
            "erin".into(),
            "pw".into(),
            0,
            None,
            now,
        )
        .await
        .expect("create should succeed");

        // Ten years later the key still validates.
        authenticate(
            &fx.store,
            &fx.notifier,
            attempt_for(&fx.app, "erin", "pw", "H1"),
            now + Duration::days(3650),
        )
        .await
        .expect("lifetime login should succeed");
    }

    #[tokio::test]
    async fn concurrent_first_logins_bind_exactly_once() {
        // ---
        let fx = fixture().await;
        let now = Utc::now();

        issue_credential(
            &fx.store,
            fx.app.app_id,
            "frank".into(),
            "pw".into(),
            30,
            None,
            now,
        )
        .await
        .expect("create should succeed");

        let tasks = (0..8).map(|i| {
            let store = fx.store.clone();
            let notifier = fx.notifier.clone();
            let attempt = attempt_for(&fx.app, "frank", "pw", &format!("HWID-{i}"));
            tokio::spawn(async move { authenticate(&store, &notifier, attempt, now).await })
        });

        let results = futures::future::join_all(tasks).await;

        let mut successes = 0;
        for result in results {
            match result.expect("task should not panic") {
                Ok(_) => successes += 1,
                Err(err) => assert!(matches!(err, AuthError::HwidMismatch)),
            }
        }
        assert_eq!(successes, 1, "exactly one attempt may bind");

        let stored = fx
            .store
            .get_credential(fx.app.app_id, "frank")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.hwid.is_some());
    }

    #[tokio::test]
    async fn racing_to_the_same_hwid_is_not_a_mismatch() {
        // ---
        let fx = fixture().await;
        let now = Utc::now();

        let credential = issue_credential(
            &fx.store,
            fx.app.app_id,
            "grace".into(),
            "pw".into(),
            30,
            None,
            now,
        )
        .await
        .expect("create should succeed");

        // The CAS itself reports one winner...
        let first = fx.store.try_bind_hwid(credential.id, "H1").await.unwrap();
        let second = fx.store.try_bind_hwid(credential.id, "H1").await.unwrap();
        assert!(first);
        assert!(!second);

        // ...but a login that lost the race to its own HWID still succeeds.
        authenticate(
            &fx.store,
            &fx.notifier,
            attempt_for(&fx.app, "grace", "pw", "H1"),
            now,
        )
        .await
        .expect("same-HWID retry should succeed");
    }

    #[tokio::test]
    async fn webhook_fires_only_when_enabled_and_filters_nothing_here() {
        // ---
        let fx = fixture().await;
        let now = Utc::now();

        issue_credential(
            &fx.store,
            fx.app.app_id,
            "heidi".into(),
            "pw".into(),
            30,
            None,
            now,
        )
        .await
        .expect("create should succeed");

        // No webhook configured: no event.
        authenticate(
            &fx.store,
            &fx.notifier,
            attempt_for(&fx.app, "heidi", "pw", "H1"),
            now,
        )
        .await
        .expect("login should succeed");
        assert!(fx.recorder.events.lock().unwrap().is_empty());

        // Disabled webhook: still no event.
        let mut config = WebhookConfig {
            url: "https://hooks.example.test/keygate".to_string(),
            enabled: false,
            show_hwid: true,
            show_ip: true,
            show_app: true,
            show_expiry: true,
        };
        fx.store
            .set_webhook_config(fx.app.app_id, config.clone())
            .await
            .expect("webhook config should apply");

        authenticate(
            &fx.store,
            &fx.notifier,
            attempt_for(&fx.app, "heidi", "pw", "H1"),
            now,
        )
        .await
        .expect("login should succeed");
        assert!(fx.recorder.events.lock().unwrap().is_empty());

        // Enabled webhook: event carries the login data.
        config.enabled = true;
        fx.store
            .set_webhook_config(fx.app.app_id, config)
            .await
            .expect("webhook config should apply");

        authenticate(
            &fx.store,
            &fx.notifier,
            attempt_for(&fx.app, "heidi", "pw", "H1"),
            now,
        )
        .await
        .expect("login should succeed");

        let events = fx.recorder.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        let (event, config) = &events[0];
        assert_eq!(event.username, "heidi");
        assert_eq!(event.hwid, "H1");
        assert_eq!(event.app_name, "Test App");
        assert!(config.enabled);
    }
}
