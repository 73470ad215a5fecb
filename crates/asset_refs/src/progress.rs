/// Receiver for long-running operation progress
pub trait ProgressSink: Send + Sync {
    /// `fraction` is in `0.0..=1.0`
    fn report(&self, message: &str, fraction: f32);

    fn clear(&self);
}

/// Logs progress at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, message: &str, fraction: f32) {
        tracing::debug!("{} ({:.0}%)", message, fraction * 100.0);
    }

    fn clear(&self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _message: &str, _fraction: f32) {}

    fn clear(&self) {}
}
