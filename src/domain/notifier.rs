use super::models::{LoginEvent, WebhookConfig};
use std::sync::Arc;

/// Fire-and-forget sink for successful-login events.
///
/// Implementations must not block the caller and must not surface delivery
/// failures — dispatch happens on a detached task and errors stay in the
/// logs.
pub trait Notifier: Send + Sync {
    // ---
    fn login_succeeded(&self, event: LoginEvent, config: WebhookConfig);
}

/// Type alias for any backend that implements Notifier.
pub type NotifierPtr = Arc<dyn Notifier>;
