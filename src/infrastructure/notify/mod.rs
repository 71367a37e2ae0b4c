mod webhook_notifier;

pub use webhook_notifier::WebhookNotifier;
use std::sync::Arc;
use std::time::Duration;

/// Creates the reqwest-backed webhook notifier.
///
/// `timeout` bounds each delivery attempt; there are no retries.
pub fn create_webhook_notifier(timeout: Duration) -> anyhow::Result<crate::domain::NotifierPtr> {
    // ---
    Ok(Arc::new(WebhookNotifier::new(timeout)?))
}
