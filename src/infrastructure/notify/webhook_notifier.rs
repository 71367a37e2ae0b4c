//! Outbound webhook delivery for login events.
//!
//! Delivery is best-effort: the event is posted from a detached task and
//! failures stay in the logs, never reaching the login path.

use crate::domain::{LoginEvent, Notifier, WebhookConfig};
use anyhow::Result;
use std::time::Duration;

pub struct WebhookNotifier {
    // ---
    client: reqwest::Client,
}

impl WebhookNotifier {
    // ---
    pub fn new(timeout: Duration) -> Result<Self> {
        // ---
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

/// Build the payload the receiver sees, honoring the config's field gates.
fn payload(event: &LoginEvent, config: &WebhookConfig) -> serde_json::Value {
    // ---
    let mut body = serde_json::json!({
        "event": "user_login",
        "username": event.username,
    });

    if config.show_app {
        body["app"] = serde_json::Value::String(event.app_name.clone());
    }
    if config.show_hwid {
        body["hwid"] = serde_json::Value::String(event.hwid.clone());
    }
    if config.show_ip {
        body["ip"] = serde_json::Value::String(event.client_ip.clone());
    }
    if config.show_expiry {
        body["expires"] = serde_json::Value::String(event.expires_at.to_rfc3339());
    }

    body
}

impl Notifier for WebhookNotifier {
    // ---
    fn login_succeeded(&self, event: LoginEvent, config: WebhookConfig) {
        // ---
        if !config.enabled {
            return;
        }

        let client = self.client.clone();
        let body = payload(&event, &config);

        tokio::spawn(async move {
            match client.post(&config.url).json(&body).send().await {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!(
                        "webhook returned {} for {}",
                        response.status(),
                        config.url
                    );
                }
                Ok(_) => {
                    tracing::debug!("webhook delivered to {}", config.url);
                }
                Err(err) => {
                    tracing::warn!("webhook delivery to {} failed: {err}", config.url);
                }
            }
        });
    }
}
