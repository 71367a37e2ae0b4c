use std::sync::Arc;

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> String;

    /// Record a client login attempt and its outcome.
    fn record_login(&self, success: bool);

    /// Record an issued end-user credential.
    fn record_credential_created(&self);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
